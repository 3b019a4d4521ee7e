//! Parse command (resolve replica specs against a total).

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use spread_allocator::{ReplicaSpec, ReplicaSpecParser, StandardParser};
use tabled::Tabled;

use crate::output::print_output;

use super::CommandContext;

/// Parse command - show what each replica spec resolves to.
#[derive(Debug, Args)]
pub struct ParseCommand {
    /// Workload total the specs are resolved against.
    #[arg(long)]
    total: u32,

    /// Replica specs, e.g. 3 or 30%.
    #[arg(required = true, allow_hyphen_values = true)]
    specs: Vec<String>,
}

#[derive(Debug, Serialize, Tabled)]
struct SpecRow {
    #[tabled(rename = "Spec")]
    spec: String,
    #[tabled(rename = "Replicas", display = "display_replicas")]
    replicas: Option<u32>,
    #[tabled(rename = "Error", display = "display_error")]
    error: Option<String>,
}

fn display_replicas(replicas: &Option<u32>) -> String {
    replicas.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string())
}

fn display_error(error: &Option<String>) -> String {
    error.clone().unwrap_or_default()
}

/// Interpret a command-line argument as a replica spec.
fn spec_from_arg(arg: &str) -> ReplicaSpec {
    match arg.trim().parse::<i64>() {
        Ok(count) => ReplicaSpec::Count(count),
        Err(_) => ReplicaSpec::text(arg),
    }
}

fn resolve_rows(total: u32, specs: &[String]) -> Vec<SpecRow> {
    specs
        .iter()
        .map(|raw| match StandardParser.parse(total, &spec_from_arg(raw)) {
            Ok(replicas) => SpecRow {
                spec: raw.clone(),
                replicas: Some(replicas),
                error: None,
            },
            Err(e) => SpecRow {
                spec: raw.clone(),
                replicas: None,
                error: Some(e.to_string()),
            },
        })
        .collect()
}

impl ParseCommand {
    pub fn run(self, ctx: CommandContext) -> Result<()> {
        let rows = resolve_rows(self.total, &self.specs);
        print_output(&rows, ctx.format);
        Ok(())
    }
}
