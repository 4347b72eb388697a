//! Self-leveling torque for bodies that should stay upright

use crate::physics::components::Body;
use serde::{Deserialize, Serialize};

/// PD controller driving a body's rotation back to zero
///
/// `torque = -rotation * restoring_torque_multiplier - angular_velocity * damping_torque_multiplier`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RestoringController {
    pub restoring_torque_multiplier: f32,
    pub damping_torque_multiplier: f32,
}

impl Default for RestoringController {
    fn default() -> Self {
        Self {
            restoring_torque_multiplier: 10.0,
            damping_torque_multiplier: 0.5,
        }
    }
}

impl RestoringController {
    pub fn new(restoring_torque_multiplier: f32, damping_torque_multiplier: f32) -> Self {
        Self {
            restoring_torque_multiplier,
            damping_torque_multiplier,
        }
    }

    /// Corrective torque for the given rotation and angular velocity
    pub fn torque(&self, rotation: f32, angular_velocity: f32) -> f32 {
        let restoring = -rotation * self.restoring_torque_multiplier;
        let damping = -angular_velocity * self.damping_torque_multiplier;
        restoring + damping
    }

    /// Apply one step of corrective torque to `body`
    pub fn apply(&self, body: &mut Body, dt: f32) {
        let torque = self.torque(body.rotation, body.angular_velocity);
        body.apply_torque(torque, dt);
    }
}
