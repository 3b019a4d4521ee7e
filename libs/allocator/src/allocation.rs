//! Allocation results and the top-level entry points.

use std::collections::BTreeMap;

use serde::Serialize;
use spread_replicas::{ReplicaSpecParser, StandardParser};
use tracing::{debug, instrument};

use crate::allocator::ReplicaAllocator;
use crate::feasibility::Feasibility;
use crate::resolve::{resolve_specified, AllocationObserver, TracingObserver};
use crate::subset::{build_snapshot, ObservedReplicas, Topology};

/// Observed and target replicas of one subset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubsetChange {
    pub name: String,
    pub current: u32,
    pub target: u32,
}

impl SubsetChange {
    /// Signed change from current to target.
    pub fn delta(&self) -> i64 {
        i64::from(self.target) - i64::from(self.current)
    }

    pub fn is_unchanged(&self) -> bool {
        self.current == self.target
    }
}

/// Result of allocating a workload's replicas across its subsets.
///
/// The target replicas must be applied whether or not the pinned replicas
/// were feasible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    replicas: BTreeMap<String, u32>,
    feasibility: Feasibility,
    changes: Vec<SubsetChange>,
    summary: String,
}

impl Allocation {
    /// Target replicas keyed by subset name.
    pub fn replicas(&self) -> &BTreeMap<String, u32> {
        &self.replicas
    }

    pub fn replicas_of(&self, subset: &str) -> Option<u32> {
        self.replicas.get(subset).copied()
    }

    pub fn feasibility(&self) -> &Feasibility {
        &self.feasibility
    }

    pub fn is_feasible(&self) -> bool {
        self.feasibility.is_feasible()
    }

    /// Why pinned replicas were not applied; empty when feasible.
    pub fn reason(&self) -> String {
        self.feasibility.reason()
    }

    /// Per-subset changes, in topology order.
    pub fn changes(&self) -> &[SubsetChange] {
        &self.changes
    }

    /// Total replicas moved: the sum of absolute per-subset deltas.
    pub fn churn(&self) -> u64 {
        self.changes.iter().map(|c| c.delta().unsigned_abs()).sum()
    }

    /// Sum of target replicas.
    pub fn total(&self) -> u64 {
        self.replicas.values().map(|&r| u64::from(r)).sum()
    }

    /// Debug listing of targets in (replicas, name) order.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Split into (targets, feasible, reason).
    pub fn into_parts(self) -> (BTreeMap<String, u32>, bool, String) {
        let feasible = self.feasibility.is_feasible();
        let reason = self.feasibility.reason();
        (self.replicas, feasible, reason)
    }
}

/// Allocate `total` replicas over `topology` with the standard spec parser,
/// reporting through `tracing`.
pub fn allocate_replicas(total: u32, topology: &Topology, observed: &ObservedReplicas) -> Allocation {
    allocate_replicas_with(total, topology, observed, &StandardParser, &TracingObserver)
}

/// Allocate `total` replicas over `topology` with injected collaborators.
///
/// Subset names in `topology` must be unique. Observed counts for subsets
/// outside the topology are ignored; topology subsets without an observed
/// count start from zero.
#[instrument(skip_all, fields(total = total, subsets = topology.len()))]
pub fn allocate_replicas_with<P, O>(
    total: u32,
    topology: &Topology,
    observed: &ObservedReplicas,
    parser: &P,
    observer: &O,
) -> Allocation
where
    P: ReplicaSpecParser + ?Sized,
    O: AllocationObserver + ?Sized,
{
    let snapshot = build_snapshot(topology, observed);
    let current: BTreeMap<String, u32> = snapshot
        .iter()
        .map(|s| (s.name.clone(), s.replicas))
        .collect();

    let specified = resolve_specified(total, topology, parser, observer);

    let mut allocator = ReplicaAllocator::sorted(snapshot);
    let (replicas, feasibility) = allocator.allocate(total, Some(&specified));
    if let Some(why) = feasibility.infeasibility() {
        observer.constraints_infeasible(why);
    }

    let summary = allocator.summary();
    debug!(
        feasible = feasibility.is_feasible(),
        summary = %summary,
        "Allocated subset replicas"
    );

    let changes = topology
        .subsets
        .iter()
        .map(|def| SubsetChange {
            name: def.name.clone(),
            current: current.get(&def.name).copied().unwrap_or(0),
            target: replicas.get(&def.name).copied().unwrap_or(0),
        })
        .collect();

    Allocation {
        replicas,
        feasibility,
        changes,
        summary,
    }
}
