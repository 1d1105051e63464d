//! Document submission guarded by admission control.
//!
//! The submitter checks eligibility first, then asks the rate limiter for an
//! admission, and only then hands the serialized document to the sink.

use crate::application::limiter::RateLimiter;
use crate::application::metrics::Metrics;
use crate::application::ports::{DocumentSink, WriteError};
use crate::domain::document::Document;
use crate::domain::eligibility::EligibilityRule;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "async")]
use crate::application::ports::{DocumentSource, TransportError};

/// Result of a submission attempt.
///
/// Rejections are expected outcomes, not errors. Callers can branch on
/// "never eligible" vs. "try later" vs. "transient failure".
#[derive(Debug)]
pub enum SubmissionOutcome {
    /// The document was handed to the sink successfully
    Submitted,
    /// The document's producer is not eligible; nothing was consumed or written
    RejectedIneligible,
    /// No admission was available; nothing was written
    RejectedRateLimited,
    /// The sink write failed after an admission was consumed
    SubmissionFailed(WriteError),
}

impl SubmissionOutcome {
    /// Check if the document was submitted.
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmissionOutcome::Submitted)
    }

    /// Check if the document was rejected as ineligible.
    pub fn is_ineligible(&self) -> bool {
        matches!(self, SubmissionOutcome::RejectedIneligible)
    }

    /// Check if the document was rejected by the rate limiter.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, SubmissionOutcome::RejectedRateLimited)
    }

    /// Check if the sink write failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, SubmissionOutcome::SubmissionFailed(_))
    }

    /// Whether trying the same document again later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SubmissionOutcome::RejectedRateLimited | SubmissionOutcome::SubmissionFailed(_)
        )
    }
}

impl fmt::Display for SubmissionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionOutcome::Submitted => write!(f, "document submitted"),
            SubmissionOutcome::RejectedIneligible => {
                write!(f, "document producer is not eligible for submission")
            }
            SubmissionOutcome::RejectedRateLimited => {
                write!(f, "too many requests, try again later")
            }
            SubmissionOutcome::SubmissionFailed(e) => write!(f, "submission failed: {}", e),
        }
    }
}

/// Submits documents through a sink, at most as fast as the limiter allows.
///
/// # Example
/// ```no_run
/// use registry_throttle::{DocumentSubmitter, FileSink, RateLimiter};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let limiter = Arc::new(RateLimiter::new(Duration::from_secs(1), 3).unwrap());
/// let submitter = DocumentSubmitter::new(limiter, FileSink::new("out"));
/// # let document: registry_throttle::Document = todo!();
///
/// let outcome = submitter.submit(&document, "document.json");
/// if outcome.is_retryable() {
///     // back off and try again
/// }
/// ```
#[derive(Debug)]
pub struct DocumentSubmitter<K>
where
    K: DocumentSink,
{
    limiter: Arc<RateLimiter>,
    eligibility: EligibilityRule,
    sink: K,
    metrics: Metrics,
}

impl<K> DocumentSubmitter<K>
where
    K: DocumentSink,
{
    /// Create a submitter with the default eligibility rule.
    ///
    /// Outcome counters are recorded into the limiter's metrics.
    pub fn new(limiter: Arc<RateLimiter>, sink: K) -> Self {
        let metrics = limiter.metrics().clone();
        Self {
            limiter,
            eligibility: EligibilityRule::default(),
            sink,
            metrics,
        }
    }

    /// Replace the eligibility rule.
    pub fn with_eligibility(mut self, eligibility: EligibilityRule) -> Self {
        self.eligibility = eligibility;
        self
    }

    /// Submit `document` to `destination`.
    ///
    /// Ineligible documents never consume an admission. Once admitted, the
    /// admission stays spent even if the write fails.
    pub fn submit(&self, document: &Document, destination: &str) -> SubmissionOutcome {
        if !self.eligibility.is_eligible(document) {
            self.metrics.record_ineligible();
            tracing::debug!(
                doc_id = %document.doc_id,
                producer = %document.producer_tax_id,
                "document rejected: producer not eligible"
            );
            return SubmissionOutcome::RejectedIneligible;
        }

        if !self.limiter.try_acquire() {
            self.metrics.record_rate_limited();
            tracing::warn!(
                doc_id = %document.doc_id,
                destination,
                "document rejected: rate limit exceeded"
            );
            return SubmissionOutcome::RejectedRateLimited;
        }

        let result = document
            .to_pretty_json()
            .map_err(WriteError::from)
            .and_then(|payload| self.sink.write(destination, &payload));

        match result {
            Ok(()) => {
                self.metrics.record_submitted();
                tracing::info!(doc_id = %document.doc_id, destination, "document submitted");
                SubmissionOutcome::Submitted
            }
            Err(e) => {
                self.metrics.record_failed();
                tracing::warn!(
                    doc_id = %document.doc_id,
                    destination,
                    error = %e,
                    "document submission failed"
                );
                SubmissionOutcome::SubmissionFailed(e)
            }
        }
    }

    /// Fetch one document from `source` and submit it to `destination`.
    ///
    /// # Errors
    /// Returns the `TransportError` if the fetch fails; nothing is submitted
    /// and no admission is consumed in that case.
    #[cfg(feature = "async")]
    #[cfg_attr(docsrs, doc(cfg(feature = "async")))]
    pub async fn fetch_and_submit<S>(
        &self,
        source: &S,
        destination: &str,
    ) -> Result<SubmissionOutcome, TransportError>
    where
        S: DocumentSource + ?Sized,
    {
        let document = source.fetch_document().await.map_err(|e| {
            tracing::warn!(error = %e, "document fetch failed");
            e
        })?;
        Ok(self.submit(&document, destination))
    }

    /// Get the eligibility rule in use.
    pub fn eligibility(&self) -> &EligibilityRule {
        &self.eligibility
    }

    /// Get a reference to the limiter.
    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Get a reference to the sink.
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Get a reference to the metrics.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mocks::document::sample_document;
    use crate::infrastructure::mocks::{MockClock, MockDocumentSink};
    use std::time::{Duration, Instant};

    fn submitter(max_requests: usize) -> (DocumentSubmitter<MockDocumentSink>, MockClock) {
        let clock = MockClock::new(Instant::now());
        let limiter = RateLimiter::builder()
            .with_window(Duration::from_secs(1))
            .with_max_requests(max_requests)
            .with_clock(Arc::new(clock.clone()))
            .build()
            .unwrap();
        (
            DocumentSubmitter::new(Arc::new(limiter), MockDocumentSink::new()),
            clock,
        )
    }

    #[test]
    fn test_eligible_document_is_written() {
        let (submitter, _clock) = submitter(1);

        let outcome = submitter.submit(&sample_document("RF"), "doc.json");

        assert!(outcome.is_submitted());
        let writes = submitter.sink().writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].destination, "doc.json");
        assert_eq!(
            Document::from_json(&writes[0].payload).unwrap(),
            sample_document("RF")
        );
    }

    #[test]
    fn test_ineligible_document_consumes_nothing() {
        let (submitter, _clock) = submitter(1);

        for _ in 0..5 {
            let outcome = submitter.submit(&sample_document("7700000003"), "doc.json");
            assert!(outcome.is_ineligible());
        }

        // The single admission is still available
        assert!(submitter.submit(&sample_document("RF"), "doc.json").is_submitted());
        assert_eq!(submitter.sink().count(), 1);
        assert_eq!(submitter.limiter().metrics().admissions_granted(), 1);
        assert_eq!(submitter.limiter().metrics().admissions_denied(), 0);
    }

    #[test]
    fn test_ineligible_regardless_of_limiter_state() {
        let (submitter, _clock) = submitter(1);

        assert!(submitter.submit(&sample_document("RF"), "a.json").is_submitted());
        assert!(submitter
            .submit(&sample_document("rf"), "b.json")
            .is_ineligible());
    }

    #[test]
    fn test_rate_limited_document_is_not_written() {
        let (submitter, clock) = submitter(2);
        let document = sample_document("RF");

        assert!(submitter.submit(&document, "1.json").is_submitted());
        assert!(submitter.submit(&document, "2.json").is_submitted());
        assert!(submitter.submit(&document, "3.json").is_rate_limited());
        assert_eq!(submitter.sink().count(), 2);

        clock.advance(Duration::from_secs(1));
        assert!(submitter.submit(&document, "4.json").is_submitted());
        assert_eq!(submitter.sink().count(), 3);
    }

    #[test]
    fn test_failed_write_spends_admission() {
        let (submitter, _clock) = submitter(1);
        submitter.sink().fail_writes(true);

        let outcome = submitter.submit(&sample_document("RF"), "doc.json");
        assert!(outcome.is_failed());
        assert!(outcome.is_retryable());

        submitter.sink().fail_writes(false);
        assert!(submitter
            .submit(&sample_document("RF"), "doc.json")
            .is_rate_limited());
    }

    #[test]
    fn test_custom_eligibility() {
        let (submitter, _clock) = submitter(5);
        let submitter = submitter.with_eligibility(EligibilityRule::new(["РФ"]));

        assert!(submitter.submit(&sample_document("РФ"), "doc.json").is_submitted());
        assert!(submitter.submit(&sample_document("RF"), "doc.json").is_ineligible());
    }

    #[test]
    fn test_outcome_metrics() {
        let (submitter, _clock) = submitter(1);
        submitter.submit(&sample_document("RF"), "a.json");
        submitter.submit(&sample_document("RF"), "b.json");
        submitter.submit(&sample_document("XX"), "c.json");

        let snapshot = submitter.metrics().snapshot();
        assert_eq!(snapshot.documents_submitted, 1);
        assert_eq!(snapshot.documents_rate_limited, 1);
        assert_eq!(snapshot.documents_ineligible, 1);
        assert_eq!(snapshot.documents_failed, 0);
        assert_eq!(snapshot.documents_total(), 3);
    }

    #[test]
    fn test_outcome_display_and_retryable() {
        assert_eq!(SubmissionOutcome::Submitted.to_string(), "document submitted");
        assert!(!SubmissionOutcome::Submitted.is_retryable());
        assert!(!SubmissionOutcome::RejectedIneligible.is_retryable());
        assert!(SubmissionOutcome::RejectedRateLimited.is_retryable());
        assert_eq!(
            SubmissionOutcome::RejectedRateLimited.to_string(),
            "too many requests, try again later"
        );
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_fetch_and_submit() {
        use crate::infrastructure::mocks::MockDocumentSource;

        let (submitter, _clock) = submitter(1);
        let source = MockDocumentSource::new(vec![Ok(sample_document("RF"))]);

        let outcome = submitter.fetch_and_submit(&source, "doc.json").await.unwrap();
        assert!(outcome.is_submitted());
        assert_eq!(submitter.sink().count(), 1);
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_fetch_failure_consumes_nothing() {
        use crate::infrastructure::mocks::MockDocumentSource;

        let (submitter, _clock) = submitter(1);
        let source = MockDocumentSource::new(vec![Err(TransportError::EmptyBody {
            url: "http://registry.test".to_string(),
        })]);

        let result = submitter.fetch_and_submit(&source, "doc.json").await;
        assert!(matches!(result, Err(TransportError::EmptyBody { .. })));
        assert_eq!(submitter.limiter().metrics().admissions_granted(), 0);
        assert_eq!(submitter.sink().count(), 0);
    }
}
