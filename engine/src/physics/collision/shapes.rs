//! Collision shape utilities and transformations

use crate::physics::components::CollisionShape;
use glam::Vec2;

use super::Aabb;

impl CollisionShape {
    /// Get the AABB for this shape transformed by position and rotation
    pub fn world_aabb(&self, position: Vec2, rotation: f32) -> Aabb {
        match self {
            // Circles are rotation-invariant
            CollisionShape::Circle { radius } => {
                Aabb::from_center_half_extents(position, Vec2::splat(*radius))
            }
            CollisionShape::Rectangle { width, height } => {
                let (sin, cos) = rotation.sin_cos();
                let half = Vec2::new(width * 0.5, height * 0.5);
                let extents = Vec2::new(
                    cos.abs() * half.x + sin.abs() * half.y,
                    sin.abs() * half.x + cos.abs() * half.y,
                );
                Aabb::from_center_half_extents(position, extents)
            }
        }
    }
}

/// Oriented rectangle in world space
#[derive(Debug, Clone, Copy)]
pub struct OrientedRect {
    pub center: Vec2,
    /// Local x and y axes in world space
    pub axes: [Vec2; 2],
    pub half_extents: Vec2,
}

impl OrientedRect {
    pub fn new(center: Vec2, rotation: f32, width: f32, height: f32) -> Self {
        let x_axis = Vec2::from_angle(rotation);
        Self {
            center,
            axes: [x_axis, x_axis.perp()],
            half_extents: Vec2::new(width * 0.5, height * 0.5),
        }
    }

    /// Half the length of the rectangle's shadow on a unit axis
    pub fn projected_radius(&self, axis: Vec2) -> f32 {
        self.half_extents.x * self.axes[0].dot(axis).abs()
            + self.half_extents.y * self.axes[1].dot(axis).abs()
    }

    /// Corner points in world space
    pub fn corners(&self) -> [Vec2; 4] {
        let ex = self.axes[0] * self.half_extents.x;
        let ey = self.axes[1] * self.half_extents.y;
        [
            self.center - ex - ey,
            self.center + ex - ey,
            self.center + ex + ey,
            self.center - ex + ey,
        ]
    }

    /// Corner furthest along `direction`
    pub fn support(&self, direction: Vec2) -> Vec2 {
        let sx = if self.axes[0].dot(direction) >= 0.0 { 1.0 } else { -1.0 };
        let sy = if self.axes[1].dot(direction) >= 0.0 { 1.0 } else { -1.0 };
        self.center + self.axes[0] * (sx * self.half_extents.x) + self.axes[1] * (sy * self.half_extents.y)
    }
}
