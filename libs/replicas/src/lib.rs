//! # spread-replicas
//!
//! Replica specifications for workload subsets, and the parser that turns
//! them into absolute replica counts.
//!
//! ## Specification Forms
//!
//! A subset may pin its share of a workload in one of two ways:
//!
//! - An absolute count: `3`
//! - A percentage of the workload total: `"30%"`
//!
//! Percentages are resolved against the total with round-half-up, so
//! `"50%"` of 5 is 3.
//!
//! ## Parsing Contract
//!
//! - Parsing is deterministic and side-effect free
//! - A resolved count always lies in `[0, total]`
//! - Anything else is a [`SpecError`]

mod error;
mod parser;
mod spec;

pub use error::SpecError;
pub use parser::{ReplicaSpecParser, StandardParser};
pub use spec::ReplicaSpec;
