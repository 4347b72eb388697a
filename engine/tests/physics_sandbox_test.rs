//! Suspended-plate scene driven frame by frame

use glam::Vec2;
use sandbox_engine::config::SandboxConfig;
use sandbox_engine::physics::{ContactEvent, ContactSink};
use sandbox_engine::sandbox::Sandbox;
use tracing::info;

const FRAME: f64 = 1.0 / 60.0;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .try_init();
}

#[test]
fn test_first_frame_has_zero_dt() {
    let mut sandbox = Sandbox::new(SandboxConfig::default()).unwrap();
    let plate = sandbox.ground().plate;
    let before = sandbox.world().body(plate).unwrap().clone();

    let report = sandbox.frame(12_345.0).unwrap();
    assert_eq!(report.dt, 0.0);
    assert!(report.contacts.is_empty());
    assert_eq!(sandbox.world().elapsed_time(), 0.0);
    assert_eq!(sandbox.world().body(plate).unwrap(), &before);

    let report = sandbox.frame(12_345.0 + FRAME).unwrap();
    assert!((report.dt - FRAME as f32).abs() < 1e-5);
}

#[test]
fn test_long_frame_is_clamped() {
    let mut sandbox = Sandbox::new(SandboxConfig::default()).unwrap();
    sandbox.frame(0.0).unwrap();
    let report = sandbox.frame(30.0).unwrap();
    assert_eq!(report.dt, 0.25);
}

#[test]
fn test_plate_settles_level() {
    init_logging();

    let mut sandbox = Sandbox::new(SandboxConfig::default()).unwrap();
    let plate = sandbox.ground().plate;
    let cube = sandbox.test_cube().unwrap();

    for frame in 0..=600 {
        sandbox.frame(frame as f64 * FRAME).unwrap();
    }

    let (point, rotation) = sandbox.pose(plate).unwrap();
    let body = sandbox.world().body(plate).unwrap();
    info!("Plate at {:?}, rotation {}, velocity {:?}", point, rotation, body.linear_velocity);

    // Sags about 10 points under its own weight and the cube's
    assert!(point.y < -8.0 && point.y > -12.0, "plate rests at {}", point.y);
    assert!(point.x.abs() < 0.5);
    assert!(rotation.abs() < 1e-3);
    assert!(body.linear_velocity.length() < 0.05);

    // The cube rides on top
    let (cube_point, _) = sandbox.pose(cube).unwrap();
    assert!((cube_point.y - point.y - 32.5).abs() < 3.0, "cube at {}", cube_point.y);
}

#[test]
fn test_ball_bounces_off_plate() {
    init_logging();

    let mut sandbox = Sandbox::new(SandboxConfig::default()).unwrap();
    let plate = sandbox.ground().plate;

    sandbox.tap(Vec2::new(70.0, 100.0));
    sandbox.frame(0.0).unwrap();
    let (ball, _) = sandbox.world().bodies().last().unwrap();

    let mut contacts: Vec<ContactEvent> = Vec::new();
    let mut lowest = f32::MAX;
    let mut bounced = false;

    for frame in 1..=120 {
        let report = sandbox.frame(frame as f64 * FRAME).unwrap();
        let had_contact = contacts.iter().any(|c| c.involves(ball));
        contacts.record_all(&report.contacts);

        let body = sandbox.world().body(ball).unwrap();
        lowest = lowest.min(body.position.y);
        if had_contact && body.linear_velocity.y > 0.1 {
            bounced = true;
        }
    }

    let first = contacts
        .iter()
        .find(|c| c.involves(ball) && c.involves(plate))
        .expect("ball never touched the plate");
    info!("First ball contact: {:?}", first);

    assert!(first.began);
    // The plate reports; the ball keeps default category and contact masks
    assert_eq!(first.masks_a.category, 0b01);
    assert_eq!(first.masks_a.contact, 0b10);
    assert_eq!(first.masks_b.category, u32::MAX);
    assert_eq!(first.masks_b.collision, 0b01);

    assert!(bounced, "ball never moved back up");
    // Never sank through the plate
    assert!(sandbox.to_scene(Vec2::new(0.0, lowest)).y > 0.0);

    // The off-centre hit tilts the plate
    let (_, rotation) = sandbox.pose(plate).unwrap();
    info!("Plate rotation after impact: {}", rotation);
    assert!(rotation.abs() < 0.5);
}

#[test]
fn test_taps_accumulate_balls() {
    let mut sandbox = Sandbox::new(SandboxConfig::default()).unwrap();
    let queue = sandbox.command_queue();

    let input = std::thread::spawn(move || {
        for i in 0..5 {
            sandbox_engine::physics::commands::push_command(
                &queue,
                sandbox_engine::physics::WorldCommand::SpawnBall {
                    position: Vec2::new(-100.0 + i as f32 * 50.0, 300.0),
                },
            );
        }
    });
    input.join().unwrap();

    sandbox.frame(0.0).unwrap();
    assert_eq!(sandbox.world().body_count(), 8);

    let report = sandbox.frame(FRAME).unwrap();
    assert!(report.pairs_tested <= 8 * 7 / 2);
}
