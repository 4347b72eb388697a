//! Narrow phase collision detection for generating contact manifolds

use super::shapes::OrientedRect;
use super::Manifold;
use crate::physics::components::CollisionShape;
use glam::Vec2;

/// Test two posed shapes for overlap
///
/// Poses are `(position, rotation)`. The returned normal points from A to B.
pub fn test_collision(
    shape_a: &CollisionShape,
    pose_a: (Vec2, f32),
    shape_b: &CollisionShape,
    pose_b: (Vec2, f32),
) -> Option<Manifold> {
    match (shape_a, shape_b) {
        (CollisionShape::Circle { radius: radius_a }, CollisionShape::Circle { radius: radius_b }) => {
            circle_circle_collision(pose_a.0, *radius_a, pose_b.0, *radius_b)
        }
        (CollisionShape::Circle { radius }, CollisionShape::Rectangle { width, height }) => {
            circle_rect_collision(
                pose_a.0,
                *radius,
                OrientedRect::new(pose_b.0, pose_b.1, *width, *height),
            )
        }
        (CollisionShape::Rectangle { width, height }, CollisionShape::Circle { radius }) => {
            circle_rect_collision(
                pose_b.0,
                *radius,
                OrientedRect::new(pose_a.0, pose_a.1, *width, *height),
            )
            .map(Manifold::flipped)
        }
        (
            CollisionShape::Rectangle {
                width: width_a,
                height: height_a,
            },
            CollisionShape::Rectangle {
                width: width_b,
                height: height_b,
            },
        ) => rect_rect_collision(
            OrientedRect::new(pose_a.0, pose_a.1, *width_a, *height_a),
            OrientedRect::new(pose_b.0, pose_b.1, *width_b, *height_b),
        ),
    }
}

/// Test collision between two circles
fn circle_circle_collision(pos_a: Vec2, radius_a: f32, pos_b: Vec2, radius_b: f32) -> Option<Manifold> {
    let delta = pos_b - pos_a;
    let distance_sq = delta.length_squared();
    let radius_sum = radius_a + radius_b;

    if distance_sq > radius_sum * radius_sum {
        return None;
    }

    let distance = distance_sq.sqrt();
    let normal = if distance > 0.0 {
        delta / distance
    } else {
        // Concentric circles, use arbitrary normal
        Vec2::Y
    };

    let penetration = radius_sum - distance;
    let point = pos_a + normal * (radius_a - penetration * 0.5);

    Some(Manifold::new(point, normal, penetration))
}

/// Test collision between a circle (A) and an oriented rectangle (B)
fn circle_rect_collision(circle_pos: Vec2, radius: f32, rect: OrientedRect) -> Option<Manifold> {
    // Circle center in the rectangle's frame
    let offset = circle_pos - rect.center;
    let local = Vec2::new(offset.dot(rect.axes[0]), offset.dot(rect.axes[1]));
    let half = rect.half_extents;

    let closest = local.clamp(-half, half);
    let delta = local - closest;
    let distance_sq = delta.length_squared();

    if distance_sq > radius * radius {
        return None;
    }

    let distance = distance_sq.sqrt();
    let (local_normal, penetration) = if distance > 0.0 {
        (delta / distance, radius - distance)
    } else {
        // Center is inside the rectangle, push out through the nearest face
        let to_x = half.x - local.x.abs();
        let to_y = half.y - local.y.abs();
        if to_x < to_y {
            (Vec2::X * sign(local.x), radius + to_x)
        } else {
            (Vec2::Y * sign(local.y), radius + to_y)
        }
    };

    // Rectangle-to-circle normal in world space, flipped to point from A to B
    let outward = rect.axes[0] * local_normal.x + rect.axes[1] * local_normal.y;
    let normal = -outward;
    let point = circle_pos + normal * radius;

    Some(Manifold::new(point, normal, penetration))
}

/// Test collision between two oriented rectangles with the separating axis test
fn rect_rect_collision(a: OrientedRect, b: OrientedRect) -> Option<Manifold> {
    let delta = b.center - a.center;

    let mut best_overlap = f32::MAX;
    let mut best_axis = Vec2::Y;

    for axis in [a.axes[0], a.axes[1], b.axes[0], b.axes[1]] {
        let distance = delta.dot(axis);
        let overlap = a.projected_radius(axis) + b.projected_radius(axis) - distance.abs();
        if overlap < 0.0 {
            return None;
        }
        if overlap < best_overlap {
            best_overlap = overlap;
            best_axis = if distance < 0.0 { -axis } else { axis };
        }
    }

    // Average the corners of B that sit deepest inside A, so a flat face
    // resting on a face yields a centered contact
    let corners = b.corners();
    let deepest = corners
        .iter()
        .map(|corner| corner.dot(best_axis))
        .fold(f32::MAX, f32::min);
    let tolerance = 1e-3 * (1.0 + b.half_extents.max_element());

    let mut sum = Vec2::ZERO;
    let mut count = 0.0;
    for corner in corners {
        if corner.dot(best_axis) <= deepest + tolerance {
            sum += corner;
            count += 1.0;
        }
    }
    let incident = if count > 0.0 {
        sum / count
    } else {
        b.support(-best_axis)
    };

    let point = incident + best_axis * (best_overlap * 0.5);
    Some(Manifold::new(point, best_axis, best_overlap))
}

fn sign(value: f32) -> f32 {
    if value < 0.0 {
        -1.0
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_circle() {
        let circle = CollisionShape::circle(1.0);
        let manifold = test_collision(&circle, (Vec2::ZERO, 0.0), &circle, (Vec2::new(1.5, 0.0), 0.0))
            .expect("circles overlap");
        assert_eq!(manifold.normal, Vec2::X);
        assert!((manifold.penetration - 0.5).abs() < 1e-6);
        assert!((manifold.point - Vec2::new(0.75, 0.0)).length() < 1e-6);

        assert!(test_collision(&circle, (Vec2::ZERO, 0.0), &circle, (Vec2::new(2.5, 0.0), 0.0)).is_none());
    }

    #[test]
    fn test_circle_resting_on_rectangle() {
        let ball = CollisionShape::circle(20.0);
        let plate = CollisionShape::rectangle(320.0, 35.0);

        // Ball center 30 above the plate center: 2.5 units of overlap
        let manifold = test_collision(&ball, (Vec2::new(0.0, 35.0), 0.0), &plate, (Vec2::ZERO, 0.0))
            .expect("ball touches plate");
        assert!((manifold.normal - Vec2::new(0.0, -1.0)).length() < 1e-5);
        assert!((manifold.penetration - 2.5).abs() < 1e-4);
        assert!((manifold.point - Vec2::new(0.0, 15.0)).length() < 1e-4);

        // Same pair with the order swapped flips the normal
        let swapped = test_collision(&plate, (Vec2::ZERO, 0.0), &ball, (Vec2::new(0.0, 35.0), 0.0))
            .expect("plate touches ball");
        assert!((swapped.normal - Vec2::Y).length() < 1e-5);
    }

    #[test]
    fn test_circle_center_inside_rectangle() {
        let ball = CollisionShape::circle(1.0);
        let plate = CollisionShape::rectangle(10.0, 2.0);

        let manifold = test_collision(&ball, (Vec2::new(0.0, 0.5), 0.0), &plate, (Vec2::ZERO, 0.0))
            .expect("center inside");
        // Nearest face is the top one, 0.5 away
        assert!((manifold.normal - Vec2::new(0.0, -1.0)).length() < 1e-5);
        assert!((manifold.penetration - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_circle_misses_rotated_rectangle_corner() {
        let ball = CollisionShape::circle(0.5);
        let plate = CollisionShape::rectangle(2.0, 2.0);
        // Rotated 45°, the corner reaches √2 along x
        let pose = (Vec2::ZERO, std::f32::consts::FRAC_PI_4);
        assert!(test_collision(&ball, (Vec2::new(1.8, 0.0), 0.0), &plate, pose).is_some());
        assert!(test_collision(&ball, (Vec2::new(2.0, 0.0), 0.0), &plate, pose).is_none());
    }

    #[test]
    fn test_rectangles_face_to_face() {
        let plate = CollisionShape::rectangle(320.0, 35.0);
        let cube = CollisionShape::rectangle(30.0, 30.0);

        // Cube sits 1 unit into the top of the plate
        let manifold = test_collision(&plate, (Vec2::ZERO, 0.0), &cube, (Vec2::new(0.0, 31.5), 0.0))
            .expect("cube overlaps plate");
        assert!((manifold.normal - Vec2::Y).length() < 1e-5);
        assert!((manifold.penetration - 1.0).abs() < 1e-4);
        // Centered under the cube
        assert!(manifold.point.x.abs() < 1e-4);
    }

    #[test]
    fn test_rectangles_separated() {
        let cube = CollisionShape::rectangle(1.0, 1.0);
        assert!(test_collision(&cube, (Vec2::ZERO, 0.0), &cube, (Vec2::new(1.3, 0.0), 0.3)).is_none());
        assert!(test_collision(&cube, (Vec2::ZERO, 0.0), &cube, (Vec2::new(0.0, 2.0), 0.0)).is_none());
    }
}
