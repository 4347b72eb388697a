//! The suspended-plate sandbox scene
//!
//! A dynamic plate hangs from a static anchor on a spring and levels
//! itself with a restoring controller. Taps spawn balls that fall onto it.
//! Scene coordinates are points; the physics world runs in meters.

use crate::config::{ConfigError, SandboxConfig};
use crate::physics::clock::FrameClock;
use crate::physics::commands::{
    create_command_queue, drain_commands, push_command, WorldCommand, WorldCommandQueue,
};
use crate::physics::components::{BodyDesc, BodyHandle, CollisionShape};
use crate::physics::error::PhysicsError;
use crate::physics::filter::FilterMasks;
use crate::physics::joint::{JointHandle, SpringJointDesc};
use crate::physics::world::{PhysicsWorld, StepReport};
use glam::Vec2;
use tracing::{debug, info, warn};

/// Errors that can occur while building a sandbox
#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),
}

/// Handles of the bodies and joint forming the suspended plate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundRig {
    /// Static anchor the spring hangs from
    pub anchor: BodyHandle,
    pub plate: BodyHandle,
    pub spring: JointHandle,
}

/// Creates balls in a world
#[derive(Debug, Clone)]
pub struct Spawner {
    /// Ball radius in meters
    pub radius: f32,
    pub mass: f32,
    pub masks: FilterMasks,
}

impl Spawner {
    pub fn from_config(config: &SandboxConfig) -> Self {
        let radius = config.to_meters(config.ball_radius);
        let shape = CollisionShape::circle(radius);

        // Balls only block against the ground category. Unless configured,
        // they keep the all-categories default so the plate's contact mask
        // always sees them.
        let mut masks = FilterMasks::default().with_collision(config.ground_category);
        if config.assign_ball_category {
            masks = masks.with_category(config.ball_category);
        }

        Self {
            radius,
            mass: shape.area() * config.density,
            masks,
        }
    }

    /// Description of a ball centred on `position` (meters)
    pub fn ball_desc(&self, position: Vec2) -> BodyDesc {
        BodyDesc::dynamic(CollisionShape::circle(self.radius))
            .with_position(position)
            .with_mass(self.mass)
            .with_masks(self.masks)
    }

    /// Add a ball to `world`; takes part in simulation from the next step
    pub fn spawn_at(&self, world: &mut PhysicsWorld, position: Vec2) -> BodyHandle {
        let handle = world.add_body(self.ball_desc(position));
        debug!(handle = handle.index(), ?position, "Spawned ball");
        handle
    }
}

/// Scene state: world, ground rig, spawner and frame driver
#[derive(Debug)]
pub struct Sandbox {
    config: SandboxConfig,
    world: PhysicsWorld,
    ground: GroundRig,
    test_cube: Option<BodyHandle>,
    spawner: Spawner,
    commands: WorldCommandQueue,
    clock: FrameClock,
}

impl Sandbox {
    /// Validate `config` and build the scene
    pub fn new(config: SandboxConfig) -> Result<Self, SandboxError> {
        config.validate()?;
        let (world, ground, test_cube) = build_scene(&config)?;

        Ok(Self {
            spawner: Spawner::from_config(&config),
            clock: FrameClock::new(config.max_frame_dt),
            commands: create_command_queue(),
            config,
            world,
            ground,
            test_cube,
        })
    }

    /// Request a ball at a scene point; applied at the start of the next frame
    pub fn tap(&self, point: Vec2) {
        push_command(&self.commands, WorldCommand::SpawnBall { position: point });
    }

    /// Queue shared with input handlers on other threads
    pub fn command_queue(&self) -> WorldCommandQueue {
        self.commands.clone()
    }

    /// Spawn a ball at a scene point right away
    pub fn spawn_at(&mut self, point: Vec2) -> BodyHandle {
        let position = self.to_world(point);
        self.spawner.spawn_at(&mut self.world, position)
    }

    /// Run one frame at wall-clock time `now` (seconds)
    ///
    /// Queued commands are applied first, then the world is stepped by the
    /// time since the previous frame. The first frame steps by zero.
    ///
    /// Every queued command is applied even if one fails. The first failure
    /// is returned and the frame is not stepped, so the next frame covers
    /// the skipped time.
    pub fn frame(&mut self, now: f64) -> Result<StepReport, PhysicsError> {
        let mut first_error = None;
        for command in drain_commands(&self.commands) {
            let result = match command {
                WorldCommand::SpawnBall { position } => {
                    self.spawn_at(position);
                    Ok(())
                }
                WorldCommand::RemoveBody { handle } => {
                    self.world.remove_body(handle).map(|_| ())
                }
            };
            if let Err(error) = result {
                warn!(%error, "World command failed");
                first_error.get_or_insert(error);
            }
        }
        if let Some(error) = first_error {
            return Err(error);
        }

        let dt = self.clock.tick(now);

        self.world.step(dt)
    }

    /// Rebuild the scene from its config, dropping every spawned body
    pub fn restart(&mut self) -> Result<(), PhysicsError> {
        let (world, ground, test_cube) = build_scene(&self.config)?;
        let discarded = drain_commands(&self.commands).len();
        self.world = world;
        self.ground = ground;
        self.test_cube = test_cube;
        self.clock.reset();
        info!(discarded_commands = discarded, "Sandbox restarted");
        Ok(())
    }

    /// Position in scene points and rotation of a body
    pub fn pose(&self, handle: BodyHandle) -> Result<(Vec2, f32), PhysicsError> {
        let body = self.world.body(handle)?;
        Ok((self.to_scene(body.position), body.rotation))
    }

    pub fn to_world(&self, point: Vec2) -> Vec2 {
        point / self.config.points_per_meter
    }

    pub fn to_scene(&self, position: Vec2) -> Vec2 {
        position * self.config.points_per_meter
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    pub fn ground(&self) -> GroundRig {
        self.ground
    }

    pub fn test_cube(&self) -> Option<BodyHandle> {
        self.test_cube
    }

    pub fn spawner(&self) -> &Spawner {
        &self.spawner
    }
}

fn build_scene(
    config: &SandboxConfig,
) -> Result<(PhysicsWorld, GroundRig, Option<BodyHandle>), PhysicsError> {
    let mut world = PhysicsWorld::new(config.physics_config());

    let anchor_size = config.to_meters(1.0);
    let anchor_shape = CollisionShape::rectangle(anchor_size, anchor_size);
    let anchor = world.add_body(
        BodyDesc::fixed(anchor_shape).with_mass(anchor_shape.area() * config.density),
    );

    let plate_width = config.to_meters(config.ground_width);
    let plate_height = config.to_meters(config.ground_height);
    let plate_shape = CollisionShape::rectangle(plate_width, plate_height);
    let mut plate_desc = BodyDesc::dynamic(plate_shape)
        .with_mass(plate_shape.area() * config.density)
        .with_category_mask(config.ground_category)
        .with_contact_mask(config.ball_category)
        .with_restitution(config.ground_restitution)
        .with_friction(config.ground_friction);
    if let Some(inertia) = config.ground_inertia {
        plate_desc = plate_desc.with_inertia(inertia);
    }
    let plate = world.add_body(plate_desc);

    let spring = world.add_joint(
        SpringJointDesc::new(anchor, plate, Vec2::ZERO, Vec2::ZERO)
            .with_frequency(config.spring_frequency)
            .with_damping(config.spring_damping),
    )?;
    world.enroll_restoring(plate, config.restoring_controller())?;

    let test_cube = config.spawn_test_cube.then(|| {
        let size = config.to_meters(config.cube_size);
        let shape = CollisionShape::rectangle(size, size);
        // Resting on top of the plate
        let position = Vec2::new(0.0, plate_height * 0.5 + size * 0.5);
        world.add_body(
            BodyDesc::dynamic(shape)
                .with_position(position)
                .with_mass(shape.area() * config.density)
                .with_collision_mask(config.ground_category),
        )
    });

    info!(
        bodies = world.body_count(),
        joints = world.joint_count(),
        plate_mass = world.body(plate)?.mass,
        plate_inertia = world.body(plate)?.inertia,
        "Built sandbox scene"
    );

    Ok((
        world,
        GroundRig {
            anchor,
            plate,
            spring,
        },
        test_cube,
    ))
}
