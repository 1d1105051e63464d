//! Eligibility of a document for submission.
//!
//! A document qualifies when its producer code is one of a configured set of
//! jurisdiction codes. Matching is exact: case-sensitive, no trimming.

use crate::domain::document::Document;
use serde::Deserialize;
use std::collections::BTreeSet;

/// Producer code accepted when no explicit set is configured.
pub const DEFAULT_ELIGIBLE_PRODUCER: &str = "RF";

/// Rule deciding whether a document may be submitted at all.
///
/// # Example
/// ```
/// use registry_throttle::EligibilityRule;
///
/// let rule = EligibilityRule::new(["RF", "РФ"]);
/// assert!(rule.is_eligible_producer("РФ"));
/// assert!(!rule.is_eligible_producer("rf"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct EligibilityRule {
    eligible_producers: BTreeSet<String>,
}

impl EligibilityRule {
    /// Create a rule accepting exactly the given producer codes.
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            eligible_producers: codes.into_iter().map(Into::into).collect(),
        }
    }

    /// Check a raw producer code.
    pub fn is_eligible_producer(&self, producer: &str) -> bool {
        self.eligible_producers.contains(producer)
    }

    /// Check a document's producer code.
    pub fn is_eligible(&self, document: &Document) -> bool {
        self.is_eligible_producer(&document.producer_tax_id)
    }

    /// The configured producer codes.
    pub fn eligible_producers(&self) -> impl Iterator<Item = &str> {
        self.eligible_producers.iter().map(String::as_str)
    }
}

impl Default for EligibilityRule {
    fn default() -> Self {
        Self::new([DEFAULT_ELIGIBLE_PRODUCER])
    }
}
