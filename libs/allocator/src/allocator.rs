//! The replica allocator.
//!
//! Records are sorted once by (replicas, name) and every tie-break below
//! relies on that order: the higher the index, the more replicas a subset
//! currently runs.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::feasibility::{Feasibility, Infeasibility};
use crate::resolve::SpecifiedReplicas;
use crate::subset::{sort_subsets, SubsetAllocation};

/// Allocates target replicas over an exclusively owned set of records.
#[derive(Debug, Clone)]
pub struct ReplicaAllocator {
    subsets: Vec<SubsetAllocation>,
}

impl ReplicaAllocator {
    /// Take ownership of `subsets` and sort them for allocation.
    pub fn sorted(mut subsets: Vec<SubsetAllocation>) -> Self {
        sort_subsets(&mut subsets);
        Self { subsets }
    }

    /// Records in allocation order.
    pub fn subsets(&self) -> &[SubsetAllocation] {
        &self.subsets
    }

    /// Check whether `specified` can be honored for `total`.
    ///
    /// An absent map is always feasible.
    pub fn check_feasibility(
        &self,
        total: u32,
        specified: Option<&SpecifiedReplicas>,
    ) -> Feasibility {
        let Some(specified) = specified else {
            return Feasibility::Feasible;
        };

        let specified_sum: u64 = specified.values().map(|&r| u64::from(r)).sum();

        match specified_sum.cmp(&u64::from(total)) {
            Ordering::Greater => Feasibility::Infeasible(Infeasibility::SpecifiedExceedsTotal {
                specified: specified_sum,
                total,
            }),
            Ordering::Less => {
                let pinned = self
                    .subsets
                    .iter()
                    .filter(|s| specified.contains_key(&s.name))
                    .count();
                if pinned == self.subsets.len() {
                    Feasibility::Infeasible(Infeasibility::SpecifiedBelowTotal {
                        specified: specified_sum,
                        total,
                    })
                } else {
                    Feasibility::Feasible
                }
            }
            Ordering::Equal => Feasibility::Feasible,
        }
    }

    /// Allocate `total` replicas.
    ///
    /// Feasible pins go through [`Self::normal_allocate`]; otherwise the
    /// pins are dropped and [`Self::incremental_allocate`] rebalances from
    /// the current distribution. Either way the returned map covers every
    /// subset and sums to `total` (given at least one subset).
    pub fn allocate(
        &mut self,
        total: u32,
        specified: Option<&SpecifiedReplicas>,
    ) -> (BTreeMap<String, u32>, Feasibility) {
        let feasibility = self.check_feasibility(total, specified);

        match (&feasibility, specified) {
            (Feasibility::Feasible, Some(specified)) => self.normal_allocate(total, specified),
            (Feasibility::Feasible, None) => self.normal_allocate(total, &SpecifiedReplicas::new()),
            (Feasibility::Infeasible(_), _) => self.incremental_allocate(total),
        }

        (self.to_replica_map(), feasibility)
    }

    /// Apply pinned replicas, then spread the remainder evenly over the
    /// unpinned subsets.
    ///
    /// The extra replicas of an uneven split go to the unpinned subsets with
    /// the highest index. Expects `specified` to be feasible for `total`.
    pub fn normal_allocate(&mut self, total: u32, specified: &SpecifiedReplicas) {
        let mut specified_sum: u64 = 0;
        let mut free = self.subsets.len();

        for subset in &mut self.subsets {
            if let Some(&replicas) = specified.get(&subset.name) {
                subset.replicas = replicas;
                subset.pinned = true;
                specified_sum += u64::from(replicas);
                free -= 1;
            }
        }

        if free == 0 {
            return;
        }

        let pool = u64::from(total).saturating_sub(specified_sum);
        let base = pool / free as u64;
        let mut extra = pool % free as u64;

        for subset in self.subsets.iter_mut().rev().filter(|s| !s.pinned) {
            subset.replicas = if extra > 0 {
                extra -= 1;
                (base + 1) as u32
            } else {
                base as u32
            };
        }
    }

    /// Rebalance from the current distribution toward `total`, ignoring pins.
    ///
    /// Scaling out never touches a subset that already runs more than the
    /// even share of what is left to place; scaling in never touches one that
    /// already runs less. Such subsets are peeled off from the respective end
    /// and the share is recomputed over the rest.
    pub fn incremental_allocate(&mut self, total: u32) {
        let current: u64 = self.subsets.iter().map(|s| u64::from(s.replicas)).sum();
        let mut remaining = u64::from(total);

        match remaining.cmp(&current) {
            Ordering::Equal => {}
            Ordering::Greater => {
                let mut end = self.subsets.len();
                while end > 0 {
                    let last = u64::from(self.subsets[end - 1].replicas);
                    if remaining.div_ceil(end as u64) >= last {
                        break;
                    }
                    remaining -= last;
                    end -= 1;
                }
                spread(&mut self.subsets[..end], remaining);
            }
            Ordering::Less => {
                let len = self.subsets.len();
                let mut start = 0;
                while start < len {
                    let first = u64::from(self.subsets[start].replicas);
                    if remaining / (len - start) as u64 <= first {
                        break;
                    }
                    remaining -= first;
                    start += 1;
                }
                spread(&mut self.subsets[start..], remaining);
            }
        }
    }

    /// Target replicas keyed by subset name.
    pub fn to_replica_map(&self) -> BTreeMap<String, u32> {
        self.subsets
            .iter()
            .map(|s| (s.name.clone(), s.replicas))
            .collect()
    }

    /// Deterministic `" name -> replicas;"` listing in (replicas, name) order.
    pub fn summary(&self) -> String {
        let mut ordered: Vec<_> = self.subsets.iter().collect();
        ordered.sort_by(|a, b| a.allocation_order(b));

        ordered
            .iter()
            .map(|s| format!(" {} -> {};", s.name, s.replicas))
            .collect()
    }
}

impl std::fmt::Display for ReplicaAllocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.summary())
    }
}

/// Split `amount` evenly over `subsets`, giving the remainder to the
/// highest indices.
fn spread(subsets: &mut [SubsetAllocation], amount: u64) {
    if subsets.is_empty() {
        return;
    }

    let count = subsets.len() as u64;
    let base = amount / count;
    let extra = amount % count;
    let first_extra = count - extra;

    for (offset, subset) in subsets.iter_mut().enumerate() {
        subset.replicas = if offset as u64 >= first_extra {
            (base + 1) as u32
        } else {
            base as u32
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allocator(current: &[(&str, u32)]) -> ReplicaAllocator {
        ReplicaAllocator::sorted(
            current
                .iter()
                .map(|(name, replicas)| SubsetAllocation::new(*name, *replicas))
                .collect(),
        )
    }

    fn specified(pins: &[(&str, u32)]) -> SpecifiedReplicas {
        pins.iter().map(|(n, r)| (n.to_string(), *r)).collect()
    }

    fn replicas(allocator: &ReplicaAllocator, name: &str) -> u32 {
        allocator.to_replica_map()[name]
    }

    #[test]
    fn test_feasibility_rules() {
        let a = allocator(&[("a", 0), ("b", 0)]);

        assert!(a.check_feasibility(10, None).is_feasible());
        assert!(a.check_feasibility(10, Some(&specified(&[]))).is_feasible());
        assert!(a
            .check_feasibility(10, Some(&specified(&[("a", 7)])))
            .is_feasible());
        assert!(a
            .check_feasibility(10, Some(&specified(&[("a", 4), ("b", 6)])))
            .is_feasible());

        assert_eq!(
            a.check_feasibility(10, Some(&specified(&[("a", 8), ("b", 8)]))),
            Feasibility::Infeasible(Infeasibility::SpecifiedExceedsTotal {
                specified: 16,
                total: 10
            })
        );
        assert_eq!(
            a.check_feasibility(10, Some(&specified(&[("a", 3), ("b", 3)]))),
            Feasibility::Infeasible(Infeasibility::SpecifiedBelowTotal {
                specified: 6,
                total: 10
            })
        );
    }

    #[test]
    fn test_normal_allocate_gives_extra_to_highest() {
        let mut a = allocator(&[("a", 0), ("b", 0), ("c", 0)]);
        a.normal_allocate(10, &specified(&[]));

        assert_eq!(replicas(&a, "a"), 3);
        assert_eq!(replicas(&a, "b"), 3);
        assert_eq!(replicas(&a, "c"), 4);
    }

    #[test]
    fn test_normal_allocate_skips_pinned() {
        // Sorted: c(1), a(2), b(8), d(9)
        let mut a = allocator(&[("a", 2), ("b", 8), ("c", 1), ("d", 9)]);
        a.normal_allocate(12, &specified(&[("d", 5)]));

        let map = a.to_replica_map();
        assert_eq!(map["d"], 5);
        // 7 over three subsets: b, the highest unpinned, takes the extra one.
        assert_eq!(map["b"], 3);
        assert_eq!(map["a"], 2);
        assert_eq!(map["c"], 2);
        assert!(a.subsets().iter().find(|s| s.name == "d").unwrap().pinned);
    }

    #[test]
    fn test_normal_allocate_fully_pinned() {
        let mut a = allocator(&[("a", 5), ("b", 5)]);
        a.normal_allocate(10, &specified(&[("a", 4), ("b", 6)]));

        assert_eq!(replicas(&a, "a"), 4);
        assert_eq!(replicas(&a, "b"), 6);
    }

    #[test]
    fn test_incremental_no_change() {
        let mut a = allocator(&[("a", 1), ("b", 7), ("c", 0)]);
        a.incremental_allocate(8);

        assert_eq!(a.to_replica_map(), specified(&[("a", 1), ("b", 7), ("c", 0)]));
    }

    #[test]
    fn test_incremental_scale_out_even() {
        let mut a = allocator(&[("a", 2), ("b", 2), ("c", 2)]);
        a.incremental_allocate(9);

        assert_eq!(a.to_replica_map(), specified(&[("a", 3), ("b", 3), ("c", 3)]));
    }

    #[test]
    fn test_incremental_scale_out_leaves_large_subsets() {
        let mut a = allocator(&[("a", 1), ("b", 1), ("c", 10)]);
        a.incremental_allocate(15);

        assert_eq!(a.to_replica_map(), specified(&[("a", 2), ("b", 3), ("c", 10)]));
    }

    #[test]
    fn test_incremental_scale_in_leaves_small_subsets() {
        let mut a = allocator(&[("a", 1), ("b", 5), ("c", 5)]);
        a.incremental_allocate(9);

        assert_eq!(a.to_replica_map(), specified(&[("a", 1), ("b", 4), ("c", 4)]));
    }

    #[test]
    fn test_incremental_scale_in_extra_goes_high() {
        // Sorted: a(0), b(4), c(6). Fair share of 7 over 3 is 2 > 0, so a stays.
        // 7 over b, c: 3 and 4, the extra landing on c.
        let mut a = allocator(&[("a", 0), ("b", 4), ("c", 6)]);
        a.incremental_allocate(7);

        assert_eq!(a.to_replica_map(), specified(&[("a", 0), ("b", 3), ("c", 4)]));
    }

    #[test]
    fn test_incremental_scale_to_zero() {
        let mut a = allocator(&[("a", 3), ("b", 4)]);
        a.incremental_allocate(0);

        assert_eq!(a.to_replica_map(), specified(&[("a", 0), ("b", 0)]));
    }

    #[test]
    fn test_allocate_falls_back_when_infeasible() {
        let mut a = allocator(&[("a", 2), ("b", 3)]);
        let (map, feasibility) = a.allocate(10, Some(&specified(&[("a", 8), ("b", 8)])));

        assert!(!feasibility.is_feasible());
        assert_eq!(map, specified(&[("a", 5), ("b", 5)]));
        assert!(a.subsets().iter().all(|s| !s.pinned));
    }

    #[test]
    fn test_summary_is_sorted() {
        let mut a = allocator(&[("c", 0), ("b", 0), ("a", 0)]);
        a.allocate(10, None);

        assert_eq!(a.summary(), " a -> 3; b -> 3; c -> 4;");
        assert_eq!(a.to_string(), a.summary());
    }
}
