//! The declarative replica specification.

use serde::{Deserialize, Serialize};

/// Replica specification attached to a subset.
///
/// Deserializes from either an integer or a string, so both
/// `replicas = 3` and `replicas = "30%"` are accepted in workload files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReplicaSpec {
    /// An absolute replica count.
    Count(i64),

    /// A string form, currently only percentages (`"30%"`).
    Text(String),
}

impl ReplicaSpec {
    /// Creates an absolute specification.
    #[must_use]
    pub fn count(count: i64) -> Self {
        Self::Count(count)
    }

    /// Creates a string specification.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

impl std::fmt::Display for ReplicaSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for ReplicaSpec {
    fn from(count: i64) -> Self {
        Self::Count(count)
    }
}

impl From<&str> for ReplicaSpec {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for ReplicaSpec {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}
