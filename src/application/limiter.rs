//! Rate limiter coordination logic.
//!
//! The rate limiter owns one window policy behind a mutex and exposes a single
//! admission operation. Callers never see the window state itself.

use crate::application::metrics::Metrics;
use crate::application::ports::Clock;
use crate::domain::policy::{AdmissionDecision, AdmissionPolicy, Policy, PolicyError, PolicyKind};
use crate::infrastructure::clock::SystemClock;
use serde::Deserialize;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Shortest pause between two attempts of a waiting acquire.
#[cfg(feature = "async")]
const MIN_RETRY_PAUSE: Duration = Duration::from_millis(1);

/// Error returned when building a `RateLimiter` fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// Maximum requests per window must be greater than zero
    #[error("max_requests must be greater than 0")]
    ZeroMaxRequests,
    /// Window duration must be greater than zero
    #[error("window duration must be greater than 0")]
    ZeroWindow,
}

impl From<PolicyError> for BuildError {
    fn from(e: PolicyError) -> Self {
        match e {
            PolicyError::ZeroMaxRequests => BuildError::ZeroMaxRequests,
            PolicyError::ZeroWindow => BuildError::ZeroWindow,
        }
    }
}

/// Immutable limiter configuration: at most `max_requests` admissions per
/// `window`.
///
/// Deserializes from `{ "window_ms": 1000, "max_requests": 3, "policy": "fixed_window" }`
/// with `policy` optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawRateLimiterConfig")]
pub struct RateLimiterConfig {
    window: Duration,
    max_requests: usize,
    policy: PolicyKind,
}

#[derive(Deserialize)]
struct RawRateLimiterConfig {
    window_ms: u64,
    max_requests: usize,
    #[serde(default)]
    policy: PolicyKind,
}

impl TryFrom<RawRateLimiterConfig> for RateLimiterConfig {
    type Error = BuildError;

    fn try_from(raw: RawRateLimiterConfig) -> Result<Self, Self::Error> {
        Self::new(Duration::from_millis(raw.window_ms), raw.max_requests)
            .map(|config| config.with_policy(raw.policy))
    }
}

impl RateLimiterConfig {
    /// Create a config using the default (restarting window) policy.
    ///
    /// # Errors
    /// Returns `BuildError` if `window` or `max_requests` is zero.
    pub fn new(window: Duration, max_requests: usize) -> Result<Self, BuildError> {
        if max_requests == 0 {
            return Err(BuildError::ZeroMaxRequests);
        }
        if window.is_zero() {
            return Err(BuildError::ZeroWindow);
        }
        Ok(Self {
            window,
            max_requests,
            policy: PolicyKind::default(),
        })
    }

    /// Select the window algorithm.
    pub fn with_policy(mut self, policy: PolicyKind) -> Self {
        self.policy = policy;
        self
    }

    /// Length of one window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Admissions allowed per window.
    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    /// Window algorithm in use.
    pub fn policy(&self) -> PolicyKind {
        self.policy
    }
}

/// Builder for constructing a `RateLimiter`.
pub struct RateLimiterBuilder {
    window: Duration,
    max_requests: usize,
    policy: PolicyKind,
    clock: Option<Arc<dyn Clock>>,
    metrics: Option<Metrics>,
}

impl RateLimiterBuilder {
    /// Set the window length.
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Set the number of admissions allowed per window.
    pub fn with_max_requests(mut self, max_requests: usize) -> Self {
        self.max_requests = max_requests;
        self
    }

    /// Select the window algorithm (default: restarting window).
    pub fn with_policy(mut self, policy: PolicyKind) -> Self {
        self.policy = policy;
        self
    }

    /// Take window, request limit and policy from a config.
    pub fn with_config(mut self, config: RateLimiterConfig) -> Self {
        self.window = config.window;
        self.max_requests = config.max_requests;
        self.policy = config.policy;
        self
    }

    /// Use a custom clock (default: `SystemClock`).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Report into an existing metrics instance.
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Build the rate limiter.
    ///
    /// The first window starts at the moment of construction.
    ///
    /// # Errors
    /// Returns `BuildError` if the window or the request limit is zero.
    pub fn build(self) -> Result<RateLimiter, BuildError> {
        let config = RateLimiterConfig::new(self.window, self.max_requests)?.with_policy(self.policy);
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock::new()) as Arc<dyn Clock>);
        let policy = Policy::from_kind(config.policy, config.max_requests, config.window, clock.now())?;

        Ok(RateLimiter {
            config,
            policy: Mutex::new(policy),
            clock,
            metrics: self.metrics.unwrap_or_default(),
        })
    }
}

/// Admission control shared by concurrent callers.
///
/// All decisions go through one lock held only for the read-check-update of
/// the window state, so admissions form a single global sequence. Share it
/// across threads with `Arc<RateLimiter>`.
///
/// # Example
/// ```
/// use registry_throttle::RateLimiter;
/// use std::time::Duration;
///
/// let limiter = RateLimiter::new(Duration::from_secs(1), 2).unwrap();
///
/// assert!(limiter.try_acquire());
/// assert!(limiter.try_acquire());
/// assert!(!limiter.try_acquire());
/// ```
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimiterConfig,
    policy: Mutex<Policy>,
    clock: Arc<dyn Clock>,
    metrics: Metrics,
}

impl RateLimiter {
    /// Create a limiter allowing `max_requests` admissions per `window`, using
    /// the restarting window policy and the system clock.
    ///
    /// # Errors
    /// Returns `BuildError` if `window` or `max_requests` is zero.
    pub fn new(window: Duration, max_requests: usize) -> Result<Self, BuildError> {
        Self::builder()
            .with_window(window)
            .with_max_requests(max_requests)
            .build()
    }

    /// Start building a limiter. Defaults: one-second window, one request.
    pub fn builder() -> RateLimiterBuilder {
        RateLimiterBuilder {
            window: Duration::from_secs(1),
            max_requests: 1,
            policy: PolicyKind::default(),
            clock: None,
            metrics: None,
        }
    }

    /// Request an admission and get the full decision.
    ///
    /// Never blocks beyond the short critical section of the decision itself.
    pub fn admit(&self) -> AdmissionDecision {
        let decision = {
            let mut policy = self.policy.lock().unwrap_or_else(PoisonError::into_inner);
            let now = self.clock.now();
            policy.register_request(now)
        };

        match decision {
            AdmissionDecision::Admitted => self.metrics.record_granted(),
            AdmissionDecision::Denied { retry_after } => {
                self.metrics.record_denied();
                tracing::debug!(
                    retry_after_ms = u64::try_from(retry_after.as_millis()).unwrap_or(u64::MAX),
                    max_requests = self.config.max_requests,
                    "admission denied"
                );
            }
        }

        decision
    }

    /// Request an admission: `true` if admitted, `false` if denied.
    pub fn try_acquire(&self) -> bool {
        self.admit().is_admitted()
    }

    /// Wait up to `max_wait` for an admission.
    ///
    /// Retries after the policy's `retry_after` hint, sleeping outside the
    /// lock. Every attempt counts as an admission request in the metrics.
    /// Returns `false` if no admission was granted before `max_wait` elapsed.
    /// A `max_wait` too large to add to the current instant (such as
    /// `Duration::MAX`) waits without a deadline.
    ///
    /// The deadline and the pauses run on tokio's timer, while decisions use
    /// the limiter's [`Clock`]. With a hand-driven clock such as `MockClock`,
    /// a denial only clears once something advances that clock.
    #[cfg(feature = "async")]
    #[cfg_attr(docsrs, doc(cfg(feature = "async")))]
    pub async fn acquire(&self, max_wait: Duration) -> bool {
        let deadline = tokio::time::Instant::now().checked_add(max_wait);

        loop {
            let retry_after = match self.admit() {
                AdmissionDecision::Admitted => return true,
                AdmissionDecision::Denied { retry_after } => retry_after,
            };

            let mut pause = retry_after.max(MIN_RETRY_PAUSE);
            if let Some(deadline) = deadline {
                let now = tokio::time::Instant::now();
                if now >= deadline {
                    return false;
                }
                pause = pause.min(deadline - now);
            }
            tokio::time::sleep(pause).await;
        }
    }

    /// Drop all window history and start a fresh window now.
    pub fn reset(&self) {
        let mut policy = self.policy.lock().unwrap_or_else(PoisonError::into_inner);
        policy.reset(self.clock.now());
    }

    /// Get the limiter configuration.
    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }

    /// Get a reference to the metrics.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}
