//! Periodic animation driver.

use crate::shapes::{ShapeHandle, ShapeTrait};
use std::time::Duration;

/// Advances animated shapes one frame per period.
#[derive(Debug, Clone)]
pub struct AnimationDriver {
    period: Duration,
    /// Elapsed time not yet consumed by a tick.
    accumulated: Duration,
}

impl AnimationDriver {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            accumulated: Duration::ZERO,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Run one frame on every animated shape. Returns true if any moved.
    pub fn tick(&mut self, shapes: &[ShapeHandle]) -> bool {
        let mut animated = false;
        for handle in shapes {
            let mut shape = handle.borrow_mut();
            if shape.is_animated() {
                shape.animate_step();
                animated = true;
            }
        }
        animated
    }

    /// Account for `elapsed` wall time and run one tick per whole period.
    /// Returns true if any tick moved a shape.
    pub fn advance(&mut self, elapsed: Duration, shapes: &[ShapeHandle]) -> bool {
        self.accumulated += elapsed;
        let mut animated = false;
        while self.accumulated >= self.period {
            self.accumulated -= self.period;
            animated |= self.tick(shapes);
        }
        animated
    }

    /// Drop any partially accumulated period.
    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
    }
}

impl Default for AnimationDriver {
    fn default() -> Self {
        Self::new(Duration::from_millis(crate::config::DEFAULT_ANIMATION_PERIOD_MS))
    }
}
