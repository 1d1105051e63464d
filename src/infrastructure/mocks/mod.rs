//! Mock implementations for testing.
//!
//! This module provides test doubles for the ports and for log capture,
//! enabling controlled testing of admission and submission logic.

pub mod clock;
pub mod document;
pub mod layer;
pub mod sink;
#[cfg(feature = "async")]
pub mod source;

pub use clock::MockClock;
pub use layer::{CapturedEvent, MockCaptureLayer};
pub use sink::{MockDocumentSink, RecordedWrite};
#[cfg(feature = "async")]
pub use source::MockDocumentSource;
