//! Subset definitions and the per-call allocation records built from them.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use spread_replicas::ReplicaSpec;

/// Observed replica counts, keyed by subset name.
pub type ObservedReplicas = BTreeMap<String, u32>;

/// A subset as configured in the workload topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsetDef {
    /// Subset name, unique within the topology.
    pub name: String,

    /// Optional pinned replica specification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<ReplicaSpec>,
}

impl SubsetDef {
    /// Create an unspecified subset.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            replicas: None,
        }
    }

    /// Create a subset pinned by `spec`.
    pub fn pinned(name: impl Into<String>, spec: impl Into<ReplicaSpec>) -> Self {
        Self {
            name: name.into(),
            replicas: Some(spec.into()),
        }
    }
}

/// Ordered subset definitions of a workload.
///
/// Subset names must be unique; the allocator does not check this.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub subsets: Vec<SubsetDef>,
}

impl Topology {
    pub fn new(subsets: Vec<SubsetDef>) -> Self {
        Self { subsets }
    }

    /// Append a subset definition.
    #[must_use]
    pub fn with_subset(mut self, subset: SubsetDef) -> Self {
        self.subsets.push(subset);
        self
    }

    pub fn len(&self) -> usize {
        self.subsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subsets.is_empty()
    }
}

/// Allocation record for one subset.
///
/// `replicas` holds the observed count when the record is built and the
/// target count once an allocation has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsetAllocation {
    pub name: String,
    pub replicas: u32,

    /// Set when a pinned value was applied during fair allocation.
    pub pinned: bool,
}

impl SubsetAllocation {
    pub fn new(name: impl Into<String>, replicas: u32) -> Self {
        Self {
            name: name.into(),
            replicas,
            pinned: false,
        }
    }

    /// Ordering used for every tie-break: replicas, then name.
    pub fn allocation_order(&self, other: &Self) -> Ordering {
        self.replicas
            .cmp(&other.replicas)
            .then_with(|| self.name.cmp(&other.name))
    }
}

/// Build one record per topology subset from the observed counts.
///
/// Subsets missing from `observed` start at zero replicas. Observed entries
/// for names outside the topology are ignored.
pub fn build_snapshot(topology: &Topology, observed: &ObservedReplicas) -> Vec<SubsetAllocation> {
    topology
        .subsets
        .iter()
        .map(|def| {
            let replicas = observed.get(&def.name).copied().unwrap_or(0);
            SubsetAllocation::new(def.name.clone(), replicas)
        })
        .collect()
}

/// Sort records ascending by (replicas, name).
pub fn sort_subsets(subsets: &mut [SubsetAllocation]) {
    subsets.sort_by(SubsetAllocation::allocation_order);
}
