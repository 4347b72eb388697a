//! 2D physics sandbox engine
//!
//! This crate provides a small rigid-body kernel (bodies, spring joints,
//! self-leveling, mask-filtered collisions) and the suspended-plate scene
//! built on top of it.

pub mod config;
pub mod physics;
pub mod sandbox;

// Re-export commonly used types
pub mod prelude {
    // Math types
    pub use glam::Vec2;

    // Config types
    pub use crate::config::{ConfigError, SandboxConfig};

    // Physics types
    pub use crate::physics::{
        Body, BodyDesc, BodyHandle, CollisionShape, ContactEvent, ContactSink, FilterMasks,
        FrameClock, JointHandle, PhysicsConfig, PhysicsError, PhysicsWorld, RestoringController,
        SpringJointDesc, StepReport, TracingContactSink, WorldCommand,
    };

    // Scene types
    pub use crate::sandbox::{GroundRig, Sandbox, SandboxError, Spawner};
}

/// Initialize logging for the engine
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
