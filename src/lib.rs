//! # registry-throttle
//!
//! Client-side admission control for submitting documents to a remote
//! registry API.
//!
//! A [`RateLimiter`] allows at most N admissions per time window and is shared
//! by any number of threads. A [`DocumentSubmitter`] checks that a document is
//! eligible, asks the limiter for an admission, and only then hands the
//! serialized document to a [`DocumentSink`]. Every attempt ends in a
//! [`SubmissionOutcome`] that tells "never eligible", "try later" and
//! "write failed" apart.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use registry_throttle::{DocumentSubmitter, FileSink, RateLimiter};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! // At most 3 submissions per second, shared across threads
//! let limiter = Arc::new(RateLimiter::new(Duration::from_secs(1), 3).unwrap());
//! let submitter = DocumentSubmitter::new(limiter, FileSink::new("submitted"));
//!
//! # let document: registry_throttle::Document = todo!();
//! match submitter.submit(&document, "doc-1.json") {
//!     outcome if outcome.is_submitted() => println!("done"),
//!     outcome if outcome.is_retryable() => println!("later: {}", outcome),
//!     outcome => println!("dropped: {}", outcome),
//! }
//! ```
//!
//! ## Window Policies
//!
//! - **Restarting window** (default): the window clock restarts on every
//!   admission, so the counter only clears after a full window without
//!   admissions. Under steady load the denial state can last indefinitely.
//! - **Fixed window**: back-to-back windows on a fixed schedule; the budget
//!   refills every window no matter how busy the limiter is.
//! - **Sliding window**: a log of recent admissions; at most N in any span of
//!   one window.
//!
//! ```rust
//! use registry_throttle::{PolicyKind, RateLimiter};
//! use std::time::Duration;
//!
//! let limiter = RateLimiter::builder()
//!     .with_window(Duration::from_secs(1))
//!     .with_max_requests(10)
//!     .with_policy(PolicyKind::SlidingWindow)
//!     .build()
//!     .unwrap();
//! assert!(limiter.try_acquire());
//! ```
//!
//! ## Waiting for an Admission
//!
//! With the `async` feature, [`RateLimiter::acquire`] retries after the
//! policy's retry hint until a deadline:
//!
//! ```rust,no_run
//! # use registry_throttle::RateLimiter;
//! # use std::time::Duration;
//! # async fn run(limiter: RateLimiter) {
//! if limiter.acquire(Duration::from_secs(5)).await {
//!     // admitted
//! }
//! # }
//! ```
//!
//! ## Fetching Documents
//!
//! The `http` feature provides [`HttpDocumentSource`], which GETs one document
//! from the registry. [`DocumentSubmitter::fetch_and_submit`] chains a fetch
//! and a submission; transport errors are returned as `Err`, everything else
//! as an outcome.
//!
//! ## Observability
//!
//! Decisions and outcomes are logged through `tracing` and counted in
//! [`Metrics`]:
//!
//! ```rust
//! # use registry_throttle::RateLimiter;
//! # use std::time::Duration;
//! let limiter = RateLimiter::new(Duration::from_secs(1), 1).unwrap();
//! limiter.try_acquire();
//! limiter.try_acquire();
//!
//! let snapshot = limiter.metrics().snapshot();
//! assert_eq!(snapshot.admissions_granted, 1);
//! assert_eq!(snapshot.admissions_denied, 1);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

// Domain layer - pure business logic
pub mod domain;

// Application layer - orchestration
pub mod application;

// Infrastructure layer - external adapters
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::{
    document::{Description, Document, Product},
    eligibility::{EligibilityRule, DEFAULT_ELIGIBLE_PRODUCER},
    policy::{
        AdmissionDecision, AdmissionPolicy, FixedWindowPolicy, Policy, PolicyError, PolicyKind,
        RestartingWindowPolicy, SlidingWindowPolicy,
    },
};

pub use application::{
    limiter::{BuildError, RateLimiter, RateLimiterBuilder, RateLimiterConfig},
    metrics::{Metrics, MetricsSnapshot},
    ports::{Clock, DocumentSink, TransportError, WriteError},
    submitter::{DocumentSubmitter, SubmissionOutcome},
};

#[cfg(feature = "async")]
pub use application::ports::DocumentSource;

pub use infrastructure::{clock::SystemClock, file_sink::FileSink};

#[cfg(feature = "http")]
pub use infrastructure::http_source::{HttpDocumentSource, HttpSourceConfig, DEFAULT_DOCUMENT_URL};
