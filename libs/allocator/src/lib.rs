//! # spread-allocator
//!
//! Decides how many replicas each subset of a workload (node pool, zone,
//! cluster) should run.
//!
//! Inputs are the workload total, the ordered topology of subsets (some
//! pinning a count or percentage), and the replicas each subset runs now.
//! The output maps every subset to its target replica count.
//!
//! ## Allocation Paths
//!
//! - **Fair**: when the pinned replicas fit the total, they are applied as
//!   given and the remainder is spread evenly over the unpinned subsets.
//! - **Incremental**: when they do not fit, pins are ignored and the current
//!   distribution is rebalanced toward the total, leaving alone subsets that
//!   are already past the fair share in the direction of the change.
//!
//! # Invariants
//!
//! - Targets always sum to the total (for a non-empty topology)
//! - Decisions are deterministic given the same inputs
//! - Ties are broken by (current replicas, name)
//! - Nothing is cached between calls

mod allocation;
mod allocator;
mod feasibility;
mod resolve;
mod subset;

pub use allocation::{allocate_replicas, allocate_replicas_with, Allocation, SubsetChange};
pub use allocator::ReplicaAllocator;
pub use feasibility::{Feasibility, Infeasibility};
pub use resolve::{resolve_specified, AllocationObserver, SpecifiedReplicas, TracingObserver};
pub use subset::{
    build_snapshot, sort_subsets, ObservedReplicas, SubsetAllocation, SubsetDef, Topology,
};

/// Re-export of the replica specification crate.
pub use spread_replicas::{ReplicaSpec, ReplicaSpecParser, SpecError, StandardParser};
