//! Collision detection subsystem

pub mod broad_phase;
pub mod narrow_phase;
pub mod shapes;

use glam::Vec2;

/// Contact geometry between two overlapping shapes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Manifold {
    /// World space contact point
    pub point: Vec2,
    /// Unit normal pointing from A to B
    pub normal: Vec2,
    /// Penetration depth (zero when just touching)
    pub penetration: f32,
}

impl Manifold {
    pub fn new(point: Vec2, normal: Vec2, penetration: f32) -> Self {
        Self {
            point,
            normal,
            penetration,
        }
    }

    /// Flip the manifold (swap A and B)
    pub fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            ..self
        }
    }
}

/// Axis-aligned bounding box for broad phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create an AABB from a center point and half-extents
    pub fn from_center_half_extents(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Check if this AABB overlaps with another
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}
