//! Category / collision / contact bitmask filtering
//!
//! Every body carries three independent 32-bit masks:
//!
//! - `category`: the groups the body belongs to
//! - `collision`: the categories the body is physically blocked by
//! - `contact`: the categories whose overlaps the body wants reported
//!
//! Both tests are OR-based, so either side can opt the pair in:
//!
//! ```
//! use sandbox_engine::physics::filter::{collides, reports_contact, FilterMasks};
//!
//! let ground = FilterMasks::default().with_category(0b01).with_contact(0b10);
//! let ball = FilterMasks::default().with_collision(0b01);
//!
//! assert!(collides(&ball, &ground));
//! assert!(reports_contact(&ground, &ball));
//! ```

use serde::{Deserialize, Serialize};

/// Mask value meaning "every category"
pub const ALL_CATEGORIES: u32 = u32::MAX;

/// The three filter masks of one body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterMasks {
    pub category: u32,
    pub collision: u32,
    pub contact: u32,
}

impl Default for FilterMasks {
    /// Belongs to every category, collides with nothing, reports nothing
    fn default() -> Self {
        Self {
            category: ALL_CATEGORIES,
            collision: 0,
            contact: 0,
        }
    }
}

impl FilterMasks {
    pub fn new(category: u32, collision: u32, contact: u32) -> Self {
        Self {
            category,
            collision,
            contact,
        }
    }

    pub fn with_category(mut self, category: u32) -> Self {
        self.category = category;
        self
    }

    pub fn with_collision(mut self, collision: u32) -> Self {
        self.collision = collision;
        self
    }

    pub fn with_contact(mut self, contact: u32) -> Self {
        self.contact = contact;
        self
    }
}

/// Whether two bodies physically block each other
#[inline]
pub fn collides(a: &FilterMasks, b: &FilterMasks) -> bool {
    (a.collision & b.category) != 0 || (b.collision & a.category) != 0
}

/// Whether an overlap between two bodies produces a contact event
#[inline]
pub fn reports_contact(a: &FilterMasks, b: &FilterMasks) -> bool {
    (a.category & b.contact) != 0 || (b.category & a.contact) != 0
}

/// Result of running both filter tests on a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PairFilter {
    pub collide: bool,
    pub report: bool,
}

impl PairFilter {
    pub fn evaluate(a: &FilterMasks, b: &FilterMasks) -> Self {
        Self {
            collide: collides(a, b),
            report: reports_contact(a, b),
        }
    }

    /// Neither test passed, so the pair needs no narrow phase
    pub fn is_ignored(&self) -> bool {
        !self.collide && !self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROUND: u32 = 0b01;
    const BALL: u32 = 0b10;

    #[test]
    fn test_default_masks_never_interact() {
        let a = FilterMasks::default();
        let b = FilterMasks::default();
        assert!(!collides(&a, &b));
        assert!(!reports_contact(&a, &b));
        assert!(PairFilter::evaluate(&a, &b).is_ignored());
    }

    #[test]
    fn test_ground_and_uncategorized_ball() {
        let ground = FilterMasks::new(GROUND, 0, BALL);
        let ball = FilterMasks::default().with_collision(GROUND);

        // ball.collision & ground.category = 0b01
        assert!(collides(&ball, &ground));
        // ground.contact & ball.category (0xFFFF_FFFF) = 0b10
        assert!(reports_contact(&ground, &ball));
    }

    #[test]
    fn test_ground_and_categorized_ball() {
        let ground = FilterMasks::new(GROUND, 0, BALL);
        let ball = FilterMasks::new(BALL, GROUND, 0);

        assert!(collides(&ground, &ball));
        assert!(reports_contact(&ground, &ball));
    }

    #[test]
    fn test_collision_without_contact() {
        let ground = FilterMasks::new(GROUND, 0, 0);
        let cube = FilterMasks::default().with_collision(GROUND);

        let filter = PairFilter::evaluate(&cube, &ground);
        assert!(filter.collide);
        assert!(!filter.report);
    }

    #[test]
    fn test_contact_without_collision() {
        // The anchor keeps default masks and overlaps the plate
        let anchor = FilterMasks::default();
        let ground = FilterMasks::new(GROUND, 0, BALL);

        let filter = PairFilter::evaluate(&anchor, &ground);
        assert!(!filter.collide);
        assert!(filter.report);
    }

    #[test]
    fn test_filters_are_symmetric() {
        let masks = [
            FilterMasks::default(),
            FilterMasks::new(GROUND, 0, BALL),
            FilterMasks::new(BALL, GROUND, 0),
            FilterMasks::new(0, ALL_CATEGORIES, 0),
            FilterMasks::new(0b100, 0b011, 0b001),
        ];
        for a in &masks {
            for b in &masks {
                assert_eq!(collides(a, b), collides(b, a));
                assert_eq!(reports_contact(a, b), reports_contact(b, a));
            }
        }
    }
}
