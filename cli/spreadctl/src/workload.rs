//! Workload file loading and validation.
//!
//! A workload file carries the total replica count, the ordered subsets
//! (optionally pinned), and the replicas each subset runs now:
//!
//! ```toml
//! replicas = 10
//!
//! [[subsets]]
//! name = "zone-a"
//! replicas = "30%"
//!
//! [[subsets]]
//! name = "zone-b"
//!
//! [current]
//! zone-a = 2
//! zone-b = 8
//! ```
//!
//! Files ending in `.json` are read as JSON, everything else as TOML.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use spread_allocator::{ObservedReplicas, SubsetDef, Topology};
use thiserror::Error;

/// Errors in an otherwise well-formed workload file.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkloadError {
    #[error("workload defines no subsets")]
    EmptyTopology,

    #[error("subset name cannot be empty")]
    EmptySubsetName,

    #[error("subset '{0}' is defined more than once")]
    DuplicateSubset(String),
}

/// A workload as described in a workload file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workload {
    /// Total desired replicas.
    pub replicas: u32,

    #[serde(default)]
    pub subsets: Vec<SubsetDef>,

    /// Replicas currently running per subset.
    #[serde(default)]
    pub current: ObservedReplicas,
}

impl Workload {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("invalid workload TOML")
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("invalid workload JSON")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read workload: {}", path.display()))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&contents)
        } else {
            Self::from_toml_str(&contents)
        }
    }

    /// Check the preconditions the allocator relies on.
    pub fn validate(&self) -> Result<(), WorkloadError> {
        if self.subsets.is_empty() {
            return Err(WorkloadError::EmptyTopology);
        }

        let mut seen = BTreeSet::new();
        for subset in &self.subsets {
            if subset.name.trim().is_empty() {
                return Err(WorkloadError::EmptySubsetName);
            }
            if !seen.insert(subset.name.as_str()) {
                return Err(WorkloadError::DuplicateSubset(subset.name.clone()));
            }
        }

        Ok(())
    }

    pub fn topology(&self) -> Topology {
        Topology::new(self.subsets.clone())
    }
}
