//! Error types for the physics kernel

use crate::physics::components::BodyHandle;
use crate::physics::joint::JointHandle;

/// Errors reported by world construction and stepping
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PhysicsError {
    #[error("body handle {0:?} does not refer to a live body")]
    InvalidBody(BodyHandle),

    #[error("joint handle {0:?} does not refer to a live joint")]
    InvalidJoint(JointHandle),

    #[error("spring frequency must be positive, got {frequency}")]
    DegenerateJoint { frequency: f32 },

    #[error("spring damping must lie in [0, 1], got {damping}")]
    InvalidDamping { damping: f32 },

    #[error("joint would connect body {0:?} to itself")]
    SelfJoint(BodyHandle),

    #[error("timestep must not be negative, got {dt}")]
    NegativeTimestep { dt: f32 },

    #[error("timestep must be finite, got {dt}")]
    NonFiniteTimestep { dt: f32 },

    #[error("joint {joint:?} references removed body {body:?}")]
    DanglingJoint { joint: JointHandle, body: BodyHandle },
}
