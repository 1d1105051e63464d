//! Observability metrics for admission control and submission.
//!
//! Provides counters for monitoring and debugging how much traffic is admitted
//! and how submissions end.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Metrics tracking admission and submission statistics.
///
/// All metrics use atomic operations for thread-safe updates and reads.
/// Clones share the same counters, so a limiter and the submitters using it
/// can report into one instance.
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug, Default)]
struct MetricsInner {
    /// Admission requests that were granted
    admissions_granted: AtomicU64,
    /// Admission requests that were denied
    admissions_denied: AtomicU64,
    /// Documents handed to the sink successfully
    documents_submitted: AtomicU64,
    /// Documents rejected by the eligibility rule
    documents_ineligible: AtomicU64,
    /// Documents rejected because admission was denied
    documents_rate_limited: AtomicU64,
    /// Documents whose sink write failed
    documents_failed: AtomicU64,
}

impl Metrics {
    /// Create a new metrics tracker.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner::default()),
        }
    }

    pub(crate) fn record_granted(&self) {
        self.inner.admissions_granted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_denied(&self) {
        self.inner.admissions_denied.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_submitted(&self) {
        self.inner.documents_submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_ineligible(&self) {
        self.inner
            .documents_ineligible
            .fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rate_limited(&self) {
        self.inner
            .documents_rate_limited
            .fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failed(&self) {
        self.inner.documents_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the number of granted admissions.
    pub fn admissions_granted(&self) -> u64 {
        self.inner.admissions_granted.load(Ordering::Relaxed)
    }

    /// Get the number of denied admissions.
    pub fn admissions_denied(&self) -> u64 {
        self.inner.admissions_denied.load(Ordering::Relaxed)
    }

    /// Get the number of submitted documents.
    pub fn documents_submitted(&self) -> u64 {
        self.inner.documents_submitted.load(Ordering::Relaxed)
    }

    /// Get the number of ineligible documents.
    pub fn documents_ineligible(&self) -> u64 {
        self.inner.documents_ineligible.load(Ordering::Relaxed)
    }

    /// Get the number of rate limited documents.
    pub fn documents_rate_limited(&self) -> u64 {
        self.inner.documents_rate_limited.load(Ordering::Relaxed)
    }

    /// Get the number of documents whose write failed.
    pub fn documents_failed(&self) -> u64 {
        self.inner.documents_failed.load(Ordering::Relaxed)
    }

    /// Get a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            admissions_granted: self.admissions_granted(),
            admissions_denied: self.admissions_denied(),
            documents_submitted: self.documents_submitted(),
            documents_ineligible: self.documents_ineligible(),
            documents_rate_limited: self.documents_rate_limited(),
            documents_failed: self.documents_failed(),
        }
    }

    /// Reset all metrics to zero.
    pub fn reset(&self) {
        self.inner.admissions_granted.store(0, Ordering::Relaxed);
        self.inner.admissions_denied.store(0, Ordering::Relaxed);
        self.inner.documents_submitted.store(0, Ordering::Relaxed);
        self.inner.documents_ineligible.store(0, Ordering::Relaxed);
        self.inner.documents_rate_limited.store(0, Ordering::Relaxed);
        self.inner.documents_failed.store(0, Ordering::Relaxed);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Admission requests that were granted
    pub admissions_granted: u64,
    /// Admission requests that were denied
    pub admissions_denied: u64,
    /// Documents handed to the sink successfully
    pub documents_submitted: u64,
    /// Documents rejected by the eligibility rule
    pub documents_ineligible: u64,
    /// Documents rejected because admission was denied
    pub documents_rate_limited: u64,
    /// Documents whose sink write failed
    pub documents_failed: u64,
}

impl MetricsSnapshot {
    /// Fraction of admission requests that were denied (0.0 to 1.0).
    ///
    /// Returns 0.0 if no admission was requested.
    pub fn denial_rate(&self) -> f64 {
        let total = self.admissions_granted.saturating_add(self.admissions_denied);
        if total == 0 {
            0.0
        } else {
            self.admissions_denied as f64 / total as f64
        }
    }

    /// Total number of submission attempts, whatever their outcome.
    pub fn documents_total(&self) -> u64 {
        self.documents_submitted
            .saturating_add(self.documents_ineligible)
            .saturating_add(self.documents_rate_limited)
            .saturating_add(self.documents_failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_basic() {
        let metrics = Metrics::new();

        metrics.record_granted();
        metrics.record_granted();
        metrics.record_denied();

        assert_eq!(metrics.admissions_granted(), 2);
        assert_eq!(metrics.admissions_denied(), 1);
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = Metrics::new();
        let clone = metrics.clone();

        clone.record_submitted();
        clone.record_failed();

        assert_eq!(metrics.documents_submitted(), 1);
        assert_eq!(metrics.documents_failed(), 1);
    }

    #[test]
    fn test_snapshot_and_rates() {
        let metrics = Metrics::new();
        assert_eq!(metrics.snapshot().denial_rate(), 0.0);

        metrics.record_granted();
        metrics.record_denied();
        metrics.record_denied();
        metrics.record_denied();
        metrics.record_submitted();
        metrics.record_ineligible();
        metrics.record_rate_limited();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.denial_rate(), 0.75);
        assert_eq!(snapshot.documents_total(), 3);
    }

    #[test]
    fn test_reset() {
        let metrics = Metrics::new();
        metrics.record_granted();
        metrics.record_rate_limited();

        metrics.reset();

        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_concurrent_updates() {
        use std::thread;

        let metrics = Metrics::new();
        let mut handles = Vec::new();

        for _ in 0..8 {
            let metrics = metrics.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..1000 {
                    metrics.record_granted();
                    metrics.record_denied();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(metrics.admissions_granted(), 8000);
        assert_eq!(metrics.admissions_denied(), 8000);
    }
}
