//! Headless sandbox run: scripted taps, a synthetic 60 Hz clock, and
//! contact and pose logging in place of rendering

use sandbox_engine::prelude::*;
use tracing::info;

/// Simulated frames per second
const FRAME_RATE: f64 = 60.0;

/// Total run length in seconds
const RUN_SECONDS: f64 = 10.0;

/// Frame index and scene point of each scripted tap
const TAPS: [(u64, [f32; 2]); 4] = [
    (30, [100.0, 150.0]),
    (90, [-80.0, 200.0]),
    (150, [0.0, 250.0]),
    (240, [120.0, 300.0]),
];

fn main() -> Result<(), SandboxError> {
    // Initialize logging
    sandbox_engine::init_logging();
    info!("Starting physics sandbox");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading config from {}", path);
            SandboxConfig::from_json_file(path)?
        }
        None => SandboxConfig::default(),
    };

    let mut sandbox = Sandbox::new(config)?;
    let mut sink = TracingContactSink::default();
    let mut balls: Vec<BodyHandle> = Vec::new();

    // Wall-clock stand-in; the first frame only sets the baseline
    let start = 1_000.0;
    let total_frames = (RUN_SECONDS * FRAME_RATE) as u64;

    for frame in 0..=total_frames {
        for (tap_frame, [x, y]) in TAPS {
            if tap_frame == frame {
                info!("Tap at ({}, {})", x, y);
                sandbox.tap(Vec2::new(x, y));
            }
        }

        let before = sandbox.world().body_count();
        let report = sandbox.frame(start + frame as f64 / FRAME_RATE)?;
        sink.record_all(&report.contacts);

        // Newly spawned balls are the last bodies in creation order
        let spawned = sandbox.world().body_count() - before;
        balls.extend(
            sandbox
                .world()
                .bodies()
                .map(|(handle, _)| handle)
                .skip(before)
                .take(spawned),
        );

        if frame % FRAME_RATE as u64 == 0 {
            log_poses(&sandbox, &balls)?;
        }
    }

    info!(
        elapsed = sandbox.world().elapsed_time(),
        bodies = sandbox.world().body_count(),
        contacts = sink.recorded,
        "Sandbox run finished"
    );

    Ok(())
}

fn log_poses(sandbox: &Sandbox, balls: &[BodyHandle]) -> Result<(), PhysicsError> {
    let (plate_point, plate_rotation) = sandbox.pose(sandbox.ground().plate)?;
    info!(
        time = sandbox.world().elapsed_time(),
        x = plate_point.x,
        y = plate_point.y,
        rotation = plate_rotation,
        "Plate"
    );

    for ball in balls {
        let (point, rotation) = sandbox.pose(*ball)?;
        info!(
            ball = ball.index(),
            x = point.x,
            y = point.y,
            rotation,
            "Ball"
        );
    }

    Ok(())
}
