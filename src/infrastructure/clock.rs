//! Clock adapter backed by the monotonic system clock.
//!
//! Tests substitute `MockClock` (in `crate::infrastructure::mocks`, available
//! with the `test-helpers` feature) to step time by hand.

use crate::application::ports::Clock;
use std::time::Instant;

/// Production clock reading `Instant::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Create a new system clock.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
