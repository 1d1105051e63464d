//! Ports (interfaces) for the application layer.
//!
//! In hexagonal architecture, ports define the interfaces that the application
//! layer needs. Infrastructure adapters implement these ports.

use std::fmt::Debug;
use std::time::Instant;

#[cfg(feature = "async")]
use crate::domain::document::Document;

/// Port for obtaining current time.
///
/// This abstraction allows the application layer to work with time
/// without depending on system clock implementation details.
/// Infrastructure provides concrete implementations (SystemClock, MockClock).
pub trait Clock: Send + Sync + Debug {
    /// Get the current instant.
    fn now(&self) -> Instant;
}

/// Error returned when a document cannot be fetched.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request could not be sent or the response could not be read
    #[error("request to '{url}' failed: {message}")]
    Request {
        /// Target URL
        url: String,
        /// Underlying error message
        message: String,
    },
    /// The remote answered with a non-success status
    #[error("request to '{url}' returned status {status}")]
    Status {
        /// Target URL
        url: String,
        /// HTTP status code
        status: u16,
    },
    /// The remote answered with an empty body
    #[error("response from '{url}' has an empty body")]
    EmptyBody {
        /// Target URL
        url: String,
    },
    /// The body is not a valid document
    #[error("failed to parse document from '{url}': {source}")]
    Decode {
        /// Target URL
        url: String,
        /// Parse error
        #[source]
        source: serde_json::Error,
    },
}

/// Error returned when a submission action fails.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// I/O failure while writing to the destination
    #[error("failed to write to '{destination}': {source}")]
    Io {
        /// Destination identifier
        destination: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// The document could not be serialized
    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The sink refused the write without attempting I/O, such as an invalid
    /// destination or a sink that is not I/O-backed
    #[error("write to '{destination}' rejected: {message}")]
    Rejected {
        /// Destination identifier
        destination: String,
        /// Reason reported by the sink
        message: String,
    },
}

/// Port for the submit capability.
///
/// Receives a document already serialized in its human-readable form and a
/// destination identifier (a file name, an endpoint name). Implementations
/// must be safe to call from several threads at once.
pub trait DocumentSink: Send + Sync + Debug {
    /// Persist or transmit `payload` to `destination`.
    fn write(&self, destination: &str, payload: &str) -> Result<(), WriteError>;
}

/// Port for the fetch capability.
///
/// Infrastructure provides `HttpDocumentSource` (feature `http`); tests use
/// `MockDocumentSource`.
#[cfg(feature = "async")]
#[async_trait::async_trait]
pub trait DocumentSource: Send + Sync + Debug {
    /// Fetch one document from the registry.
    async fn fetch_document(&self) -> Result<Document, TransportError>;
}

impl<T: DocumentSink + ?Sized> DocumentSink for std::sync::Arc<T> {
    fn write(&self, destination: &str, payload: &str) -> Result<(), WriteError> {
        (**self).write(destination, payload)
    }
}
