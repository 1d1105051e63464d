//! Domain layer - pure business logic with no I/O.
//!
//! This layer contains the core concepts of the submission system:
//! - Registry document schema
//! - Eligibility rule for documents
//! - Window policies deciding admission
//!
//! All types in this layer are pure and easily testable.

pub mod document;
pub mod eligibility;
pub mod policy;
