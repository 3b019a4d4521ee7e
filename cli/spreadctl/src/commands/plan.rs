//! Plan command (compute a workload's subset allocation).

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use spread_allocator::{allocate_replicas, Allocation, SubsetChange};
use tabled::Tabled;
use tracing::debug;

use crate::error::CliError;
use crate::output::{
    print_info, print_output, print_single, print_success, print_warning, OutputFormat,
};
use crate::workload::Workload;

use super::CommandContext;

/// Plan command - compute target replicas per subset.
#[derive(Debug, Args)]
pub struct PlanCommand {
    /// Workload file (TOML, or JSON with a .json extension).
    file: PathBuf,

    /// Override the workload's total replicas.
    #[arg(long)]
    replicas: Option<u32>,
}

#[derive(Debug, Serialize, Tabled)]
struct SubsetRow {
    #[tabled(rename = "Subset")]
    name: String,
    #[tabled(rename = "Current")]
    current: u32,
    #[tabled(rename = "Target")]
    target: u32,
    #[tabled(rename = "Delta")]
    delta: String,
}

impl From<&SubsetChange> for SubsetRow {
    fn from(change: &SubsetChange) -> Self {
        let delta = match change.delta() {
            0 => "-".to_string(),
            d if d > 0 => format!("+{}", d),
            d => d.to_string(),
        };
        Self {
            name: change.name.clone(),
            current: change.current,
            target: change.target,
            delta,
        }
    }
}

#[derive(Debug, Serialize)]
struct PlanOutput {
    total: u32,
    feasible: bool,
    reason: String,
    replicas: BTreeMap<String, u32>,
    changes: Vec<SubsetChange>,
    churn: u64,
    summary: String,
}

impl PlanOutput {
    fn new(total: u32, allocation: &Allocation) -> Self {
        Self {
            total,
            feasible: allocation.is_feasible(),
            reason: allocation.reason(),
            replicas: allocation.replicas().clone(),
            changes: allocation.changes().to_vec(),
            churn: allocation.churn(),
            summary: allocation.summary().to_string(),
        }
    }
}

impl PlanCommand {
    pub fn run(self, ctx: CommandContext) -> Result<()> {
        let workload = Workload::from_path(&self.file)?;
        workload
            .validate()
            .map_err(|e| CliError::invalid_workload(self.file.display().to_string(), e))?;

        let total = self.replicas.unwrap_or(workload.replicas);
        debug!(
            file = %self.file.display(),
            total,
            subsets = workload.subsets.len(),
            "Planning workload"
        );

        let allocation = allocate_replicas(total, &workload.topology(), &workload.current);

        match ctx.format {
            OutputFormat::Json => print_single(&PlanOutput::new(total, &allocation)),
            OutputFormat::Table => {
                let rows: Vec<SubsetRow> =
                    allocation.changes().iter().map(SubsetRow::from).collect();
                print_output(&rows, ctx.format);

                if allocation.is_feasible() {
                    print_success(&format!(
                        "Allocated {} replicas across {} subsets",
                        total,
                        rows.len()
                    ));
                } else {
                    print_warning(&format!(
                        "Specified replicas ignored: {}",
                        allocation.reason()
                    ));
                }
                print_info(&format!("{} replicas move", allocation.churn()));
            }
        }

        Ok(())
    }
}
