//! Resolution of pinned replica specifications.

use std::collections::BTreeMap;

use spread_replicas::{ReplicaSpec, ReplicaSpecParser, SpecError};
use tracing::{info, warn};

use crate::feasibility::Infeasibility;
use crate::subset::Topology;

/// Resolved pinned replicas, keyed by subset name.
pub type SpecifiedReplicas = BTreeMap<String, u32>;

/// Receives diagnostics from an allocation.
///
/// Observers never influence the result.
pub trait AllocationObserver {
    /// A subset's replica spec could not be resolved; the subset is
    /// treated as unspecified.
    fn spec_rejected(&self, subset: &str, spec: &ReplicaSpec, error: &SpecError);

    /// Pinned replicas were infeasible and incremental allocation ran instead.
    fn constraints_infeasible(&self, _reason: &Infeasibility) {}
}

/// Observer that reports through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl AllocationObserver for TracingObserver {
    fn spec_rejected(&self, subset: &str, spec: &ReplicaSpec, error: &SpecError) {
        warn!(
            subset = %subset,
            spec = %spec,
            error = %error,
            "Ignoring replica spec of subset"
        );
    }

    fn constraints_infeasible(&self, reason: &Infeasibility) {
        info!(reason = %reason, "Specified replicas are infeasible, rebalancing incrementally");
    }
}

/// Resolve every pinned subset of `topology` against `total`.
///
/// Subsets whose spec fails to parse are reported to `observer` once and
/// left out of the result.
pub fn resolve_specified<P, O>(
    total: u32,
    topology: &Topology,
    parser: &P,
    observer: &O,
) -> SpecifiedReplicas
where
    P: ReplicaSpecParser + ?Sized,
    O: AllocationObserver + ?Sized,
{
    let mut specified = SpecifiedReplicas::new();

    for def in &topology.subsets {
        let Some(spec) = &def.replicas else {
            continue;
        };

        match parser.parse(total, spec) {
            Ok(replicas) => {
                specified.insert(def.name.clone(), replicas);
            }
            Err(e) => observer.spec_rejected(&def.name, spec, &e),
        }
    }

    specified
}
