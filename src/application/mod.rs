//! Application layer - orchestration of domain logic.
//!
//! This layer coordinates the domain logic and manages the runtime behavior:
//! - Rate limiter (admission decisions shared across threads)
//! - Document submitter (eligibility, admission, submission)
//! - Metrics (decision and outcome counters)
//!
//! ## Ports
//!
//! The application layer defines ports (traits) that infrastructure
//! adapters must implement. This keeps the application layer independent
//! from infrastructure details.

pub mod limiter;
pub mod metrics;
pub mod ports;
pub mod submitter;
