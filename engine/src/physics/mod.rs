//! 2D rigid-body physics
//!
//! Bodies and spring joints live in a `PhysicsWorld` and are addressed by
//! stable handles. Each `step` applies gravity, solves joints, runs the
//! restoring controllers, integrates, and resolves collisions filtered by
//! the category / collision / contact masks.

pub mod clock;
pub mod collision;
pub mod commands;
pub mod components;
pub mod error;
pub mod events;
pub mod filter;
pub mod joint;
pub mod restoring;
pub mod world;

// Re-export commonly used types
pub use clock::FrameClock;
pub use commands::{WorldCommand, WorldCommandQueue};
pub use components::{Body, BodyDesc, BodyHandle, CollisionShape};
pub use error::PhysicsError;
pub use events::{ContactEvent, ContactSink, TracingContactSink};
pub use filter::{collides, reports_contact, FilterMasks, PairFilter};
pub use joint::{JointHandle, SpringJoint, SpringJointDesc};
pub use restoring::RestoringController;
pub use world::{PhysicsConfig, PhysicsWorld, StepReport};
