//! Infrastructure layer - external adapters and integrations.
//!
//! This layer provides adapters for:
//! - Clock abstraction (system time vs mock)
//! - Submit capability (file system sink)
//! - Fetch capability (HTTP source, feature `http`)

pub mod clock;
pub mod file_sink;

#[cfg(feature = "http")]
pub mod http_source;

/// Mock implementations for testing.
///
/// This module is only available when the `test-helpers` feature is enabled,
/// or during test builds. It provides controllable test doubles for the
/// clock, the fetch and submit ports, and log capture.
///
/// To use these mocks in integration tests, add to your `Cargo.toml`:
/// ```toml
/// [dev-dependencies]
/// registry-throttle = { version = "*", features = ["test-helpers"] }
/// ```
#[cfg(any(test, feature = "test-helpers"))]
pub mod mocks;
