//! Error types for replica specification parsing.

use thiserror::Error;

/// Errors that can occur when resolving a replica specification.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpecError {
    /// An absolute count is negative.
    #[error("replica count ({0}) should not be less than 0")]
    Negative(i64),

    /// An absolute count is larger than the workload total.
    #[error("replica count ({count}) exceeds workload replicas ({total})")]
    OutOfRange { count: i64, total: u32 },

    /// A string specification is not a percentage.
    #[error("replica spec '{0}' only supports an integer value or a percentage with a '%' suffix")]
    MissingPercent(String),

    /// The numeric part of a percentage does not parse.
    #[error("replica spec '{0}' is not a valid percentage")]
    InvalidPercent(String),

    /// A percentage falls outside `[0, 100]`.
    #[error("replica spec '{0}' should be in range [0%, 100%]")]
    PercentOutOfRange(String),
}

impl SpecError {
    /// Returns true if the error came from a percentage specification.
    pub fn is_percent_error(&self) -> bool {
        matches!(
            self,
            SpecError::MissingPercent(_)
                | SpecError::InvalidPercent(_)
                | SpecError::PercentOutOfRange(_)
        )
    }
}
