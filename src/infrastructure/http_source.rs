//! HTTP adapter for the fetch capability.
//!
//! # Example
//!
//! ```rust,no_run
//! use registry_throttle::{DocumentSource, HttpDocumentSource, HttpSourceConfig};
//!
//! # async fn run() -> Result<(), registry_throttle::TransportError> {
//! let source = HttpDocumentSource::new(HttpSourceConfig::default())?;
//! let document = source.fetch_document().await?;
//! println!("fetched {}", document.doc_id);
//! # Ok(())
//! # }
//! ```

use crate::application::ports::{DocumentSource, TransportError};
use crate::domain::document::Document;
use serde::Deserialize;
use std::time::Duration;

/// Registry endpoint used when none is configured.
pub const DEFAULT_DOCUMENT_URL: &str = "https://ismp.crpt.ru/api/v3/lk/documents/create";

/// Configuration for [`HttpDocumentSource`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HttpSourceConfig {
    /// URL answering a GET with one document as JSON (default: registry endpoint)
    pub url: String,
    /// Whole-request timeout (default: 30 seconds)
    #[serde(rename = "timeout_ms", deserialize_with = "millis")]
    pub timeout: Duration,
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DOCUMENT_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl HttpSourceConfig {
    /// Config for a custom URL with the default timeout.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

fn millis<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_millis)
}

/// Fetches documents from the registry over HTTP.
#[derive(Debug, Clone)]
pub struct HttpDocumentSource {
    client: reqwest::Client,
    config: HttpSourceConfig,
}

impl HttpDocumentSource {
    /// Create a source with its own HTTP client.
    ///
    /// # Errors
    /// Returns `TransportError::Request` if the client cannot be built.
    pub fn new(config: HttpSourceConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransportError::Request {
                url: config.url.clone(),
                message: e.to_string(),
            })?;
        Ok(Self { client, config })
    }

    /// Create a source sharing an existing client.
    pub fn with_client(client: reqwest::Client, config: HttpSourceConfig) -> Self {
        Self { client, config }
    }

    /// Get the source configuration.
    pub fn config(&self) -> &HttpSourceConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl DocumentSource for HttpDocumentSource {
    async fn fetch_document(&self) -> Result<Document, TransportError> {
        let url = &self.config.url;
        tracing::debug!(url = %url, "fetching document");

        let request_error = |e: reqwest::Error| TransportError::Request {
            url: url.clone(),
            message: e.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(request_error)?;
        if body.trim().is_empty() {
            return Err(TransportError::EmptyBody { url: url.clone() });
        }

        let document = Document::from_json(&body).map_err(|source| TransportError::Decode {
            url: url.clone(),
            source,
        })?;

        tracing::debug!(url = %url, doc_id = %document.doc_id, "document fetched");
        Ok(document)
    }
}
