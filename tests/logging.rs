//! Tests for the events emitted while submitting.

use registry_throttle::infrastructure::mocks::document::sample_document;
use registry_throttle::infrastructure::mocks::{MockCaptureLayer, MockDocumentSink};
use registry_throttle::{DocumentSubmitter, RateLimiter};
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

fn submitter(max_requests: usize) -> DocumentSubmitter<MockDocumentSink> {
    let limiter = Arc::new(RateLimiter::new(Duration::from_secs(60), max_requests).unwrap());
    DocumentSubmitter::new(limiter, MockDocumentSink::new())
}

#[test]
fn test_submission_and_rate_limit_events() {
    let capture = MockCaptureLayer::new();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let submitter = submitter(1);

    tracing::subscriber::with_default(subscriber, || {
        submitter.submit(&sample_document("RF"), "a.json");
        submitter.submit(&sample_document("RF"), "b.json");
    });

    let submitted = capture.with_message("document submitted");
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].level, Level::INFO);
    assert_eq!(submitted[0].field("doc_id"), Some("doc-1"));
    assert_eq!(submitted[0].field("destination"), Some("a.json"));

    let rejected = capture.with_message("document rejected: rate limit exceeded");
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].level, Level::WARN);
    assert_eq!(rejected[0].field("destination"), Some("b.json"));
}

#[test]
fn test_ineligible_rejection_is_debug() {
    let capture = MockCaptureLayer::new();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let submitter = submitter(1);

    tracing::subscriber::with_default(subscriber, || {
        submitter.submit(&sample_document("XX"), "x.json");
    });

    let rejected = capture.with_message("document rejected: producer not eligible");
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].level, Level::DEBUG);
    assert_eq!(rejected[0].field("producer"), Some("XX"));
}

#[test]
fn test_failed_write_is_warned_with_error() {
    let capture = MockCaptureLayer::new();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let submitter = submitter(1);
    submitter.sink().fail_writes(true);

    tracing::subscriber::with_default(subscriber, || {
        submitter.submit(&sample_document("RF"), "doc.json");
    });

    let failed = capture.with_message("document submission failed");
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].level, Level::WARN);
    assert!(failed[0].field("error").unwrap().contains("mock sink configured to fail"));
}
