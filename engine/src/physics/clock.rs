//! Frame clock turning wall-clock timestamps into step durations

use tracing::warn;

/// Measures the time between frame ticks
///
/// The first tick only records a baseline and yields `0.0`, so a freshly
/// created world never receives one huge initial step.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_update: Option<f64>,
    /// Upper bound on a single frame's dt
    pub max_frame_dt: f32,
}

impl FrameClock {
    pub fn new(max_frame_dt: f32) -> Self {
        Self {
            last_update: None,
            max_frame_dt,
        }
    }

    /// Record `now` (seconds) and return the elapsed time since the last tick
    pub fn tick(&mut self, now: f64) -> f32 {
        let last = *self.last_update.get_or_insert(now);
        self.last_update = Some(now);

        let dt = (now - last).max(0.0) as f32;
        if dt > self.max_frame_dt {
            warn!(
                "Frame took {} seconds. Clamping to {} to keep the step stable.",
                dt, self.max_frame_dt
            );
            return self.max_frame_dt;
        }
        dt
    }

    /// Forget the baseline; the next tick yields zero again
    pub fn reset(&mut self) {
        self.last_update = None;
    }

    pub fn last_update(&self) -> Option<f64> {
        self.last_update
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(0.25)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_is_zero() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.tick(1234.5), 0.0);
        assert!((clock.tick(1234.5 + 1.0 / 60.0) - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_time_going_backwards_clamps_to_zero() {
        let mut clock = FrameClock::default();
        clock.tick(10.0);
        assert_eq!(clock.tick(9.0), 0.0);
        assert_eq!(clock.last_update(), Some(9.0));
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut clock = FrameClock::new(0.1);
        clock.tick(0.0);
        assert_eq!(clock.tick(5.0), 0.1);
    }

    #[test]
    fn test_reset() {
        let mut clock = FrameClock::default();
        clock.tick(1.0);
        clock.reset();
        assert_eq!(clock.last_update(), None);
        assert_eq!(clock.tick(3.0), 0.0);
    }
}
