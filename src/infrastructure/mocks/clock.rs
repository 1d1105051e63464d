//! Hand-driven clock for deterministic window tests.

use crate::application::ports::Clock;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Clock that only moves when told to.
///
/// Clones share one time value, so a test can keep a handle while the
/// limiter owns another and step both at once.
///
/// # Examples
///
/// ```
/// use registry_throttle::infrastructure::mocks::MockClock;
/// use registry_throttle::RateLimiter;
/// use std::sync::Arc;
/// use std::time::{Duration, Instant};
///
/// let clock = MockClock::new(Instant::now());
/// let limiter = RateLimiter::builder()
///     .with_window(Duration::from_secs(60))
///     .with_max_requests(1)
///     .with_clock(Arc::new(clock.clone()))
///     .build()
///     .unwrap();
///
/// assert!(limiter.try_acquire());
/// assert!(!limiter.try_acquire());
///
/// clock.advance(Duration::from_secs(60));
/// assert!(limiter.try_acquire());
/// ```
#[derive(Debug, Clone)]
pub struct MockClock {
    current_time: Arc<Mutex<Instant>>,
}

impl MockClock {
    /// Create a mock clock frozen at `start`.
    pub fn new(start: Instant) -> Self {
        Self {
            current_time: Arc::new(Mutex::new(start)),
        }
    }

    /// Move the clock forward by `duration`.
    pub fn advance(&self, duration: Duration) {
        let mut time = self
            .current_time
            .lock()
            .expect("MockClock mutex poisoned - a test thread panicked while holding the lock");
        *time += duration;
    }

    /// Jump to `instant`, forwards or backwards.
    pub fn set(&self, instant: Instant) {
        let mut time = self
            .current_time
            .lock()
            .expect("MockClock mutex poisoned - a test thread panicked while holding the lock");
        *time = instant;
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        *self
            .current_time
            .lock()
            .expect("MockClock mutex poisoned - a test thread panicked while holding the lock")
    }
}
