//! Rigid body data model

use crate::physics::filter::FilterMasks;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Stable handle to a body owned by a `PhysicsWorld`
///
/// Handles are never reused, so a handle to a removed body stays
/// detectably dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub(crate) u32);

impl BodyHandle {
    /// Position of the body in the world's creation order
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Collision shape types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum CollisionShape {
    /// Circle with radius
    Circle { radius: f32 },
    /// Rectangle with full width and height, centered on the body
    Rectangle { width: f32, height: f32 },
}

impl CollisionShape {
    pub fn circle(radius: f32) -> Self {
        CollisionShape::Circle { radius }
    }

    pub fn rectangle(width: f32, height: f32) -> Self {
        CollisionShape::Rectangle { width, height }
    }

    /// Area of the shape
    pub fn area(&self) -> f32 {
        match self {
            CollisionShape::Circle { radius } => std::f32::consts::PI * radius * radius,
            CollisionShape::Rectangle { width, height } => width * height,
        }
    }

    /// Moment of inertia about the centroid for the given mass
    pub fn calculate_inertia(&self, mass: f32) -> f32 {
        match self {
            CollisionShape::Circle { radius } => 0.5 * mass * radius * radius,
            CollisionShape::Rectangle { width, height } => {
                mass * (width * width + height * height) / 12.0
            }
        }
    }

    /// Get the bounding circle radius for broad phase
    pub fn bounding_radius(&self) -> f32 {
        match self {
            CollisionShape::Circle { radius } => *radius,
            CollisionShape::Rectangle { width, height } => 0.5 * Vec2::new(*width, *height).length(),
        }
    }
}

/// Physical state of one rigid object
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub position: Vec2,
    /// Rotation in radians
    pub rotation: f32,
    pub linear_velocity: Vec2,
    pub angular_velocity: f32,

    pub is_dynamic: bool,
    pub affected_by_gravity: bool,
    pub allows_rotation: bool,

    pub masks: FilterMasks,

    /// Bounciness in [0, 1]
    pub restitution: f32,
    /// Coulomb friction coefficient in [0, 1]
    pub friction: f32,

    pub mass: f32,
    pub inertia: f32,

    pub shape: CollisionShape,
}

impl Body {
    /// Zero for bodies that do not respond to forces
    pub fn inverse_mass(&self) -> f32 {
        if self.is_dynamic && self.mass > 0.0 {
            1.0 / self.mass
        } else {
            0.0
        }
    }

    /// Zero for bodies that cannot be spun
    pub fn inverse_inertia(&self) -> f32 {
        if self.is_dynamic && self.allows_rotation && self.inertia > 0.0 {
            1.0 / self.inertia
        } else {
            0.0
        }
    }

    /// Transform a point from body space to world space
    pub fn world_point(&self, local: Vec2) -> Vec2 {
        self.position + Vec2::from_angle(self.rotation).rotate(local)
    }

    /// Transform a point from world space to body space
    pub fn local_point(&self, world: Vec2) -> Vec2 {
        Vec2::from_angle(-self.rotation).rotate(world - self.position)
    }

    /// Velocity of a world-space point rigidly attached to the body
    pub fn velocity_at(&self, world: Vec2) -> Vec2 {
        let r = world - self.position;
        self.linear_velocity + self.angular_velocity * r.perp()
    }

    /// Apply an impulse at a world-space point
    pub fn apply_impulse_at(&mut self, impulse: Vec2, world: Vec2) {
        if !self.is_dynamic {
            return;
        }
        self.linear_velocity += impulse * self.inverse_mass();
        let r = world - self.position;
        self.angular_velocity += r.perp_dot(impulse) * self.inverse_inertia();
    }

    /// Apply a torque for the duration `dt`
    pub fn apply_torque(&mut self, torque: f32, dt: f32) {
        if !self.is_dynamic || !self.allows_rotation {
            return;
        }
        self.angular_velocity += torque * self.inverse_inertia() * dt;
    }
}

/// Description used to insert a body into a world
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDesc {
    pub shape: CollisionShape,
    pub position: Vec2,
    pub rotation: f32,
    pub linear_velocity: Vec2,
    pub angular_velocity: f32,
    pub is_dynamic: bool,
    pub affected_by_gravity: bool,
    pub allows_rotation: bool,
    pub masks: FilterMasks,
    pub restitution: f32,
    pub friction: f32,
    pub mass: f32,
    /// Overrides the inertia derived from shape and mass
    pub inertia: Option<f32>,
}

impl BodyDesc {
    /// A dynamic body affected by gravity and free to rotate
    pub fn dynamic(shape: CollisionShape) -> Self {
        Self {
            shape,
            position: Vec2::ZERO,
            rotation: 0.0,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            is_dynamic: true,
            affected_by_gravity: true,
            allows_rotation: true,
            masks: FilterMasks::default(),
            restitution: 0.2,
            friction: 0.2,
            mass: 1.0,
            inertia: None,
        }
    }

    /// A static body that never moves
    pub fn fixed(shape: CollisionShape) -> Self {
        Self {
            is_dynamic: false,
            affected_by_gravity: false,
            ..Self::dynamic(shape)
        }
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_linear_velocity(mut self, velocity: Vec2) -> Self {
        self.linear_velocity = velocity;
        self
    }

    pub fn with_angular_velocity(mut self, velocity: f32) -> Self {
        self.angular_velocity = velocity;
        self
    }

    pub fn with_gravity(mut self, affected: bool) -> Self {
        self.affected_by_gravity = affected;
        self
    }

    pub fn with_rotation_allowed(mut self, allowed: bool) -> Self {
        self.allows_rotation = allowed;
        self
    }

    pub fn with_masks(mut self, masks: FilterMasks) -> Self {
        self.masks = masks;
        self
    }

    pub fn with_category_mask(mut self, mask: u32) -> Self {
        self.masks.category = mask;
        self
    }

    pub fn with_collision_mask(mut self, mask: u32) -> Self {
        self.masks.collision = mask;
        self
    }

    pub fn with_contact_mask(mut self, mask: u32) -> Self {
        self.masks.contact = mask;
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_inertia(mut self, inertia: f32) -> Self {
        self.inertia = Some(inertia);
        self
    }

    /// Build the body, clamping coefficients and zeroing static motion
    pub fn build(self) -> Body {
        let mass = self.mass.max(f32::EPSILON);
        let inertia = self
            .inertia
            .unwrap_or_else(|| self.shape.calculate_inertia(mass));

        let (linear_velocity, angular_velocity) = if self.is_dynamic {
            let angular = if self.allows_rotation {
                self.angular_velocity
            } else {
                0.0
            };
            (self.linear_velocity, angular)
        } else {
            (Vec2::ZERO, 0.0)
        };

        Body {
            position: self.position,
            rotation: self.rotation,
            linear_velocity,
            angular_velocity,
            is_dynamic: self.is_dynamic,
            affected_by_gravity: self.is_dynamic && self.affected_by_gravity,
            allows_rotation: self.allows_rotation,
            masks: self.masks,
            restitution: self.restitution.clamp(0.0, 1.0),
            friction: self.friction.clamp(0.0, 1.0),
            mass,
            inertia,
            shape: self.shape,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_creation() {
        let body = BodyDesc::dynamic(CollisionShape::circle(20.0)).build();
        assert!(body.is_dynamic);
        assert!(body.affected_by_gravity);
        assert!(body.allows_rotation);
        assert_eq!(body.masks, FilterMasks::default());

        let fixed = BodyDesc::fixed(CollisionShape::rectangle(1.0, 1.0)).build();
        assert!(!fixed.is_dynamic);
        assert!(!fixed.affected_by_gravity);
        assert_eq!(fixed.inverse_mass(), 0.0);
        assert_eq!(fixed.inverse_inertia(), 0.0);
    }

    #[test]
    fn test_fixed_body_drops_initial_velocity() {
        let fixed = BodyDesc::fixed(CollisionShape::circle(1.0))
            .with_linear_velocity(Vec2::new(3.0, 4.0))
            .with_angular_velocity(2.0)
            .build();
        assert_eq!(fixed.linear_velocity, Vec2::ZERO);
        assert_eq!(fixed.angular_velocity, 0.0);
    }

    #[test]
    fn test_coefficients_are_clamped() {
        let body = BodyDesc::dynamic(CollisionShape::circle(1.0))
            .with_restitution(1.5)
            .with_friction(-0.2)
            .build();
        assert_eq!(body.restitution, 1.0);
        assert_eq!(body.friction, 0.0);
    }

    #[test]
    fn test_inertia_calculation() {
        let circle = CollisionShape::circle(2.0);
        assert_eq!(circle.calculate_inertia(10.0), 20.0); // 0.5 * 10 * 2²

        let rect = CollisionShape::rectangle(3.0, 4.0);
        assert!((rect.calculate_inertia(12.0) - 25.0).abs() < 1e-5);
        assert!((rect.bounding_radius() - 2.5).abs() < 1e-6);

        let body = BodyDesc::dynamic(rect).with_inertia(1.0).build();
        assert_eq!(body.inertia, 1.0);
    }

    #[test]
    fn test_point_transforms() {
        let body = BodyDesc::dynamic(CollisionShape::rectangle(2.0, 1.0))
            .with_position(Vec2::new(1.0, 1.0))
            .with_rotation(std::f32::consts::FRAC_PI_2)
            .build();

        let world = body.world_point(Vec2::X);
        assert!((world - Vec2::new(1.0, 2.0)).length() < 1e-5);
        assert!((body.local_point(world) - Vec2::X).length() < 1e-5);
    }

    #[test]
    fn test_off_center_impulse_spins_body() {
        let mut body = BodyDesc::dynamic(CollisionShape::rectangle(2.0, 2.0))
            .with_gravity(false)
            .build();
        body.apply_impulse_at(Vec2::new(0.0, 1.0), Vec2::new(1.0, 0.0));
        assert!(body.angular_velocity > 0.0);
        assert_eq!(body.linear_velocity, Vec2::new(0.0, 1.0));

        let mut locked = BodyDesc::dynamic(CollisionShape::rectangle(2.0, 2.0))
            .with_rotation_allowed(false)
            .build();
        locked.apply_impulse_at(Vec2::new(0.0, 1.0), Vec2::new(1.0, 0.0));
        assert_eq!(locked.angular_velocity, 0.0);
    }
}
