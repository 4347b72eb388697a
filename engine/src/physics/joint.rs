//! Spring-damper joints between two bodies

use crate::physics::components::{Body, BodyHandle};
use crate::physics::error::PhysicsError;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use tracing::trace;

/// Stable handle to a joint owned by a `PhysicsWorld`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JointHandle(pub(crate) u32);

/// Description used to insert a spring joint into a world
#[derive(Debug, Clone, PartialEq)]
pub struct SpringJointDesc {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    /// Anchor on body A in world space at creation
    pub anchor_a: Vec2,
    /// Anchor on body B in world space at creation
    pub anchor_b: Vec2,
    /// Oscillation frequency in Hz, must be positive
    pub frequency: f32,
    /// Damping ratio in [0, 1]; 0 oscillates freely, 1 is critically damped
    pub damping: f32,
}

impl SpringJointDesc {
    pub fn new(body_a: BodyHandle, body_b: BodyHandle, anchor_a: Vec2, anchor_b: Vec2) -> Self {
        Self {
            body_a,
            body_b,
            anchor_a,
            anchor_b,
            frequency: 1.0,
            damping: 0.0,
        }
    }

    pub fn with_frequency(mut self, frequency: f32) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), PhysicsError> {
        if !(self.frequency > 0.0) || !self.frequency.is_finite() {
            return Err(PhysicsError::DegenerateJoint {
                frequency: self.frequency,
            });
        }
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(PhysicsError::InvalidDamping {
                damping: self.damping,
            });
        }
        if self.body_a == self.body_b {
            return Err(PhysicsError::SelfJoint(self.body_a));
        }
        Ok(())
    }
}

/// Spring-damper constraint pulling two anchors back to their resting offset
#[derive(Debug, Clone, PartialEq)]
pub struct SpringJoint {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    /// Anchor on body A in body space
    pub local_anchor_a: Vec2,
    /// Anchor on body B in body space
    pub local_anchor_b: Vec2,
    /// `anchor_b - anchor_a` at creation; the spring rests here
    pub rest_offset: Vec2,
    pub frequency: f32,
    pub damping: f32,
}

impl SpringJoint {
    /// Fix the world anchors of `desc` into the bodies' local frames
    pub(crate) fn new(desc: &SpringJointDesc, body_a: &Body, body_b: &Body) -> Self {
        Self {
            body_a: desc.body_a,
            body_b: desc.body_b,
            local_anchor_a: body_a.local_point(desc.anchor_a),
            local_anchor_b: body_b.local_point(desc.anchor_b),
            rest_offset: desc.anchor_b - desc.anchor_a,
            frequency: desc.frequency,
            damping: desc.damping,
        }
    }

    /// Angular frequency ω = 2π·f
    pub fn angular_frequency(&self) -> f32 {
        TAU * self.frequency
    }

    /// Spring constant for the given effective mass: k = m·ω²
    pub fn stiffness(&self, mass: f32) -> f32 {
        let omega = self.angular_frequency();
        mass * omega * omega
    }

    /// Damping coefficient for the given effective mass: c = 2·ζ·ω·m
    pub fn damping_coefficient(&self, mass: f32) -> f32 {
        2.0 * self.damping * self.angular_frequency() * mass
    }

    /// Current displacement of the anchors from the resting offset
    pub fn displacement(&self, body_a: &Body, body_b: &Body) -> Vec2 {
        let world_a = body_a.world_point(self.local_anchor_a);
        let world_b = body_b.world_point(self.local_anchor_b);
        world_b - world_a - self.rest_offset
    }

    /// Apply one step of spring-damper force to both bodies
    ///
    /// A non-dynamic body acts as a fixed anchor and receives no reaction.
    pub fn solve(&self, body_a: &mut Body, body_b: &mut Body, dt: f32) {
        let effective_mass = match (body_a.is_dynamic, body_b.is_dynamic) {
            (true, true) => body_a.mass * body_b.mass / (body_a.mass + body_b.mass),
            (false, true) => body_b.mass,
            (true, false) => body_a.mass,
            (false, false) => return,
        };

        let world_a = body_a.world_point(self.local_anchor_a);
        let world_b = body_b.world_point(self.local_anchor_b);
        let displacement = world_b - world_a - self.rest_offset;
        let relative_velocity = body_b.velocity_at(world_b) - body_a.velocity_at(world_a);

        let spring_force = -self.stiffness(effective_mass) * displacement;
        let damping_force = -self.damping_coefficient(effective_mass) * relative_velocity;
        let force = spring_force + damping_force;

        trace!(
            displacement = ?displacement,
            force = ?force,
            "Spring joint solve"
        );

        let impulse = force * dt;
        body_b.apply_impulse_at(impulse, world_b);
        body_a.apply_impulse_at(-impulse, world_a);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::components::{BodyDesc, CollisionShape};

    fn anchor() -> Body {
        BodyDesc::fixed(CollisionShape::rectangle(1.0, 1.0)).build()
    }

    fn plate() -> Body {
        BodyDesc::dynamic(CollisionShape::rectangle(10.0, 1.0))
            .with_gravity(false)
            .build()
    }

    fn desc() -> SpringJointDesc {
        SpringJointDesc::new(BodyHandle(0), BodyHandle(1), Vec2::ZERO, Vec2::ZERO)
    }

    #[test]
    fn test_rejects_degenerate_parameters() {
        assert_eq!(
            desc().with_frequency(0.0).validate(),
            Err(PhysicsError::DegenerateJoint { frequency: 0.0 })
        );
        assert!(desc().with_frequency(-2.0).validate().is_err());
        assert!(desc().with_frequency(f32::NAN).validate().is_err());
        assert_eq!(
            desc().with_frequency(2.0).with_damping(1.5).validate(),
            Err(PhysicsError::InvalidDamping { damping: 1.5 })
        );
        assert!(desc().with_frequency(2.0).with_damping(0.1).validate().is_ok());

        let self_joint = SpringJointDesc::new(BodyHandle(3), BodyHandle(3), Vec2::ZERO, Vec2::ZERO);
        assert_eq!(self_joint.validate(), Err(PhysicsError::SelfJoint(BodyHandle(3))));
    }

    #[test]
    fn test_stiffness_mapping() {
        let a = anchor();
        let b = plate();
        let soft = SpringJoint::new(&desc().with_frequency(1.0), &a, &b);
        let stiff = SpringJoint::new(&desc().with_frequency(2.0), &a, &b);
        assert!(stiff.stiffness(1.0) > soft.stiffness(1.0));
        assert!((soft.stiffness(1.0) - TAU * TAU).abs() < 1e-3);
        assert_eq!(soft.damping_coefficient(1.0), 0.0);
    }

    #[test]
    fn test_pulls_displaced_body_back() {
        let mut a = anchor();
        let mut b = plate();
        let joint = SpringJoint::new(&desc().with_frequency(2.0), &a, &b);

        b.position.y = -1.0;
        joint.solve(&mut a, &mut b, 1.0 / 60.0);

        assert!(b.linear_velocity.y > 0.0);
        // Anchor body takes no reaction
        assert_eq!(a.linear_velocity, Vec2::ZERO);
        assert_eq!(b.angular_velocity, 0.0);
    }

    #[test]
    fn test_resting_offset_is_kept() {
        let a = anchor();
        let b = plate();
        let spaced = SpringJointDesc::new(BodyHandle(0), BodyHandle(1), Vec2::ZERO, Vec2::new(0.0, -5.0))
            .with_frequency(2.0);
        let joint = SpringJoint::new(&spaced, &a, &b);
        assert_eq!(joint.displacement(&a, &b), Vec2::ZERO);
        assert_eq!(joint.local_anchor_b, Vec2::new(0.0, -5.0));
    }

    #[test]
    fn test_undamped_spring_oscillates_and_damped_spring_settles() {
        let run = |damping: f32| {
            let mut a = anchor();
            let mut b = plate();
            let joint = SpringJoint::new(&desc().with_frequency(1.0).with_damping(damping), &a, &b);
            b.position.y = -1.0;
            let dt = 1.0 / 240.0;
            let mut crossings = 0;
            let mut previous = b.position.y;
            for _ in 0..(240 * 4) {
                joint.solve(&mut a, &mut b, dt);
                b.position += b.linear_velocity * dt;
                if previous.signum() != b.position.y.signum() {
                    crossings += 1;
                }
                previous = b.position.y;
            }
            (crossings, b.position.y.abs())
        };

        let (free_crossings, free_amplitude) = run(0.0);
        assert!(free_crossings >= 6, "undamped spring crossed {free_crossings} times");
        assert!(free_amplitude <= 1.05);

        let (_, damped_amplitude) = run(1.0);
        assert!(damped_amplitude < 0.01, "critically damped spring left at {damped_amplitude}");
    }
}
