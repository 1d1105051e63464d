//! Scripted document source.

use crate::application::ports::{DocumentSource, TransportError};
use crate::domain::document::Document;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Source that replays a fixed list of fetch results, then reports an empty
/// body once exhausted.
#[derive(Debug, Clone)]
pub struct MockDocumentSource {
    responses: Arc<Mutex<VecDeque<Result<Document, TransportError>>>>,
}

impl MockDocumentSource {
    /// Create a source returning `responses` in order.
    pub fn new(responses: Vec<Result<Document, TransportError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
        }
    }

    /// Number of responses not yet handed out.
    pub fn remaining(&self) -> usize {
        self.responses
            .lock()
            .expect("MockDocumentSource mutex poisoned - a test thread panicked while holding the lock")
            .len()
    }
}

#[async_trait::async_trait]
impl DocumentSource for MockDocumentSource {
    async fn fetch_document(&self) -> Result<Document, TransportError> {
        self.responses
            .lock()
            .expect("MockDocumentSource mutex poisoned - a test thread panicked while holding the lock")
            .pop_front()
            .unwrap_or_else(|| {
                Err(TransportError::EmptyBody {
                    url: "mock://exhausted".to_string(),
                })
            })
    }
}
