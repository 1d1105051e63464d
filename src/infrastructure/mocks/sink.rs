//! Recording document sink.

use crate::application::ports::{DocumentSink, WriteError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// A write received by [`MockDocumentSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedWrite {
    /// Destination passed to the sink
    pub destination: String,
    /// Serialized document
    pub payload: String,
}

/// Sink that records every write in memory and can be told to fail.
///
/// Clones share the recorded writes and the failure switch.
#[derive(Debug, Clone, Default)]
pub struct MockDocumentSink {
    writes: Arc<Mutex<Vec<RecordedWrite>>>,
    failing: Arc<AtomicBool>,
}

impl MockDocumentSink {
    /// Create an empty, succeeding sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail (`true`) or succeed (`false`).
    pub fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// All successful writes so far, in order.
    pub fn writes(&self) -> Vec<RecordedWrite> {
        self.writes
            .lock()
            .expect("MockDocumentSink mutex poisoned - a test thread panicked while holding the lock")
            .clone()
    }

    /// Number of successful writes.
    pub fn count(&self) -> usize {
        self.writes
            .lock()
            .expect("MockDocumentSink mutex poisoned - a test thread panicked while holding the lock")
            .len()
    }
}

impl DocumentSink for MockDocumentSink {
    fn write(&self, destination: &str, payload: &str) -> Result<(), WriteError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(WriteError::Rejected {
                destination: destination.to_string(),
                message: "mock sink configured to fail".to_string(),
            });
        }

        self.writes
            .lock()
            .expect("MockDocumentSink mutex poisoned - a test thread panicked while holding the lock")
            .push(RecordedWrite {
                destination: destination.to_string(),
                payload: payload.to_string(),
            });
        Ok(())
    }
}
