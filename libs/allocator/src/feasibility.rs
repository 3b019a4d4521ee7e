//! Feasibility of pinned replica constraints.

use thiserror::Error;

/// Why pinned replicas cannot be honored for a total.
///
/// This is an expected outcome, not a failure: the allocator falls back to
/// incremental rebalancing and still produces a complete allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Infeasibility {
    /// Pinned replicas add up to more than the total.
    #[error("specified subsets' replicas ({specified}) is greater than total replicas ({total})")]
    SpecifiedExceedsTotal { specified: u64, total: u32 },

    /// Every subset is pinned and the pins add up to less than the total.
    #[error(
        "specified subsets' replicas ({specified}) is less than total replicas ({total}) \
         with no unspecified subset to absorb the difference"
    )]
    SpecifiedBelowTotal { specified: u64, total: u32 },
}

/// Outcome of the feasibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feasibility {
    Feasible,
    Infeasible(Infeasibility),
}

impl Feasibility {
    /// Returns true if pinned replicas can be applied as given.
    pub fn is_feasible(&self) -> bool {
        matches!(self, Self::Feasible)
    }

    /// Human-readable reason, empty when feasible.
    pub fn reason(&self) -> String {
        match self {
            Self::Feasible => String::new(),
            Self::Infeasible(why) => why.to_string(),
        }
    }

    pub fn infeasibility(&self) -> Option<&Infeasibility> {
        match self {
            Self::Feasible => None,
            Self::Infeasible(why) => Some(why),
        }
    }
}
