//! Window policies for admission control.
//!
//! This module defines the trait every admission policy implements and the
//! built-in window algorithms. Policies are plain state machines: they take the
//! current instant and mutate their own window state. Serializing access to a
//! policy is the caller's job (see [`RateLimiter`](crate::RateLimiter)).

use serde::Deserialize;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Decision made by an admission policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionDecision {
    /// The request is admitted and consumed one unit of the budget
    Admitted,
    /// The request is denied
    Denied {
        /// Time until the policy would next have capacity, assuming no other
        /// requests arrive in between
        retry_after: Duration,
    },
}

impl AdmissionDecision {
    /// Check if this decision is `Admitted`.
    pub fn is_admitted(&self) -> bool {
        matches!(self, AdmissionDecision::Admitted)
    }

    /// Check if this decision is `Denied`.
    pub fn is_denied(&self) -> bool {
        matches!(self, AdmissionDecision::Denied { .. })
    }

    /// The retry hint of a denial, `None` when admitted.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            AdmissionDecision::Admitted => None,
            AdmissionDecision::Denied { retry_after } => Some(*retry_after),
        }
    }
}

/// Error returned when a policy is constructed with invalid parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    /// At least one request per window must be allowed
    #[error("max_requests must be greater than 0")]
    ZeroMaxRequests,
    /// The window must have a non-zero length
    #[error("window duration must be greater than 0")]
    ZeroWindow,
}

fn validate(max_requests: usize, window: Duration) -> Result<(), PolicyError> {
    if max_requests == 0 {
        return Err(PolicyError::ZeroMaxRequests);
    }
    if window.is_zero() {
        return Err(PolicyError::ZeroWindow);
    }
    Ok(())
}

/// Trait for implementing admission policies.
pub trait AdmissionPolicy: Send + Sync {
    /// Register an admission request made at `now` and decide on it.
    ///
    /// An `Admitted` result has already consumed budget when it is returned.
    fn register_request(&mut self, now: Instant) -> AdmissionDecision;

    /// Drop all history and start a fresh window at `now`.
    fn reset(&mut self, now: Instant);
}

/// Window counter whose clock restarts on every admission.
///
/// For each request:
/// 1. If at least `window` has passed since `window_start`, the counter is
///    cleared and the window starts at `now`.
/// 2. If the counter has reached `max_requests`, the request is denied.
/// 3. Otherwise the counter is incremented and `window_start` moves to `now`.
///
/// Because step 3 moves the window start on every admission, the reset in
/// step 1 only happens after an idle gap of a full window since the last
/// admission. A steady stream of admissions defers the reset, and once the
/// budget is spent, callers stay denied until traffic pauses for a full window.
/// Use [`FixedWindowPolicy`] or [`SlidingWindowPolicy`] when that starvation is
/// not acceptable.
///
/// # Example
/// ```
/// use registry_throttle::{AdmissionPolicy, RestartingWindowPolicy};
/// use std::time::{Duration, Instant};
///
/// let start = Instant::now();
/// let mut policy = RestartingWindowPolicy::new(2, Duration::from_secs(1), start).unwrap();
///
/// assert!(policy.register_request(start).is_admitted());
/// assert!(policy.register_request(start).is_admitted());
/// assert!(policy.register_request(start).is_denied());
///
/// // A full idle window after the last admission clears the counter
/// let later = start + Duration::from_secs(1);
/// assert!(policy.register_request(later).is_admitted());
/// ```
#[derive(Debug, Clone)]
pub struct RestartingWindowPolicy {
    max_requests: usize,
    window: Duration,
    window_start: Instant,
    requests_in_window: usize,
}

impl RestartingWindowPolicy {
    /// Create a policy whose first window starts at `start`.
    ///
    /// # Errors
    /// Returns `PolicyError` if `max_requests` or `window` is zero.
    pub fn new(max_requests: usize, window: Duration, start: Instant) -> Result<Self, PolicyError> {
        validate(max_requests, window)?;
        Ok(Self {
            max_requests,
            window,
            window_start: start,
            requests_in_window: 0,
        })
    }
}

impl AdmissionPolicy for RestartingWindowPolicy {
    fn register_request(&mut self, now: Instant) -> AdmissionDecision {
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed >= self.window {
            self.requests_in_window = 0;
            self.window_start = now;
        }

        if self.requests_in_window >= self.max_requests {
            let elapsed = now.saturating_duration_since(self.window_start);
            return AdmissionDecision::Denied {
                retry_after: self.window.saturating_sub(elapsed),
            };
        }

        self.requests_in_window += 1;
        self.window_start = now;
        AdmissionDecision::Admitted
    }

    fn reset(&mut self, now: Instant) {
        self.window_start = now;
        self.requests_in_window = 0;
    }
}

/// Fixed window counter.
///
/// Windows are back-to-back intervals of length `window` anchored at the
/// start instant. Admissions never move the window; on expiry the start
/// advances by whole windows, so the budget refills on a fixed schedule
/// regardless of load.
///
/// # Example
/// ```
/// use registry_throttle::{AdmissionPolicy, FixedWindowPolicy};
/// use std::time::{Duration, Instant};
///
/// let start = Instant::now();
/// let mut policy = FixedWindowPolicy::new(1, Duration::from_secs(10), start).unwrap();
///
/// assert!(policy.register_request(start).is_admitted());
/// assert!(policy.register_request(start + Duration::from_secs(9)).is_denied());
/// assert!(policy.register_request(start + Duration::from_secs(10)).is_admitted());
/// ```
#[derive(Debug, Clone)]
pub struct FixedWindowPolicy {
    max_requests: usize,
    window: Duration,
    window_start: Instant,
    requests_in_window: usize,
}

impl FixedWindowPolicy {
    /// Create a policy whose first window starts at `start`.
    ///
    /// # Errors
    /// Returns `PolicyError` if `max_requests` or `window` is zero.
    pub fn new(max_requests: usize, window: Duration, start: Instant) -> Result<Self, PolicyError> {
        validate(max_requests, window)?;
        Ok(Self {
            max_requests,
            window,
            window_start: start,
            requests_in_window: 0,
        })
    }

    /// Move `window_start` to the beginning of the window containing `now`.
    fn roll_over(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.window {
            return;
        }

        let into_current = elapsed.as_nanos() % self.window.as_nanos();
        let into_current = Duration::from_nanos(u64::try_from(into_current).unwrap_or(u64::MAX));
        self.window_start = now.checked_sub(into_current).unwrap_or(now);
        self.requests_in_window = 0;
    }
}

impl AdmissionPolicy for FixedWindowPolicy {
    fn register_request(&mut self, now: Instant) -> AdmissionDecision {
        self.roll_over(now);

        if self.requests_in_window >= self.max_requests {
            let elapsed = now.saturating_duration_since(self.window_start);
            return AdmissionDecision::Denied {
                retry_after: self.window.saturating_sub(elapsed),
            };
        }

        self.requests_in_window += 1;
        AdmissionDecision::Admitted
    }

    fn reset(&mut self, now: Instant) {
        self.window_start = now;
        self.requests_in_window = 0;
    }
}

/// Sliding window log.
///
/// Remembers the instant of every admission in the last `window` and admits
/// while fewer than `max_requests` are remembered. An admission made at `t`
/// stops counting once `now - t >= window`.
#[derive(Debug, Clone)]
pub struct SlidingWindowPolicy {
    max_requests: usize,
    window: Duration,
    admissions: VecDeque<Instant>,
}

impl SlidingWindowPolicy {
    /// Create a sliding window policy.
    ///
    /// # Errors
    /// Returns `PolicyError` if `max_requests` or `window` is zero.
    pub fn new(max_requests: usize, window: Duration) -> Result<Self, PolicyError> {
        validate(max_requests, window)?;
        Ok(Self {
            max_requests,
            window,
            admissions: VecDeque::with_capacity(max_requests.min(1024)),
        })
    }

    /// Remove admissions that left the window.
    fn expire_old_admissions(&mut self, now: Instant) {
        while let Some(&oldest) = self.admissions.front() {
            if now.saturating_duration_since(oldest) >= self.window {
                self.admissions.pop_front();
            } else {
                break;
            }
        }
    }
}

impl AdmissionPolicy for SlidingWindowPolicy {
    fn register_request(&mut self, now: Instant) -> AdmissionDecision {
        self.expire_old_admissions(now);

        if self.admissions.len() < self.max_requests {
            self.admissions.push_back(now);
            return AdmissionDecision::Admitted;
        }

        let retry_after = self
            .admissions
            .front()
            .map(|&oldest| self.window.saturating_sub(now.saturating_duration_since(oldest)))
            .unwrap_or_default();
        AdmissionDecision::Denied { retry_after }
    }

    fn reset(&mut self, _now: Instant) {
        self.admissions.clear();
    }
}

/// Which window algorithm a limiter runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// [`RestartingWindowPolicy`]
    #[default]
    RestartingWindow,
    /// [`FixedWindowPolicy`]
    FixedWindow,
    /// [`SlidingWindowPolicy`]
    SlidingWindow,
}

/// Convenience enum over the built-in policies.
#[derive(Debug, Clone)]
pub enum Policy {
    /// Restarting window policy
    RestartingWindow(RestartingWindowPolicy),
    /// Fixed window policy
    FixedWindow(FixedWindowPolicy),
    /// Sliding window policy
    SlidingWindow(SlidingWindowPolicy),
}

impl Policy {
    /// Create a restarting window policy.
    ///
    /// # Errors
    /// Returns `PolicyError` if `max_requests` or `window` is zero.
    pub fn restarting_window(
        max_requests: usize,
        window: Duration,
        start: Instant,
    ) -> Result<Self, PolicyError> {
        RestartingWindowPolicy::new(max_requests, window, start).map(Policy::RestartingWindow)
    }

    /// Create a fixed window policy.
    ///
    /// # Errors
    /// Returns `PolicyError` if `max_requests` or `window` is zero.
    pub fn fixed_window(
        max_requests: usize,
        window: Duration,
        start: Instant,
    ) -> Result<Self, PolicyError> {
        FixedWindowPolicy::new(max_requests, window, start).map(Policy::FixedWindow)
    }

    /// Create a sliding window policy.
    ///
    /// # Errors
    /// Returns `PolicyError` if `max_requests` or `window` is zero.
    pub fn sliding_window(max_requests: usize, window: Duration) -> Result<Self, PolicyError> {
        SlidingWindowPolicy::new(max_requests, window).map(Policy::SlidingWindow)
    }

    /// Create the policy selected by `kind`.
    ///
    /// # Errors
    /// Returns `PolicyError` if `max_requests` or `window` is zero.
    pub fn from_kind(
        kind: PolicyKind,
        max_requests: usize,
        window: Duration,
        start: Instant,
    ) -> Result<Self, PolicyError> {
        match kind {
            PolicyKind::RestartingWindow => Self::restarting_window(max_requests, window, start),
            PolicyKind::FixedWindow => Self::fixed_window(max_requests, window, start),
            PolicyKind::SlidingWindow => Self::sliding_window(max_requests, window),
        }
    }

    /// The kind of this policy.
    pub fn kind(&self) -> PolicyKind {
        match self {
            Policy::RestartingWindow(_) => PolicyKind::RestartingWindow,
            Policy::FixedWindow(_) => PolicyKind::FixedWindow,
            Policy::SlidingWindow(_) => PolicyKind::SlidingWindow,
        }
    }
}

impl AdmissionPolicy for Policy {
    fn register_request(&mut self, now: Instant) -> AdmissionDecision {
        match self {
            Policy::RestartingWindow(p) => p.register_request(now),
            Policy::FixedWindow(p) => p.register_request(now),
            Policy::SlidingWindow(p) => p.register_request(now),
        }
    }

    fn reset(&mut self, now: Instant) {
        match self {
            Policy::RestartingWindow(p) => p.reset(now),
            Policy::FixedWindow(p) => p.reset(now),
            Policy::SlidingWindow(p) => p.reset(now),
        }
    }
}
