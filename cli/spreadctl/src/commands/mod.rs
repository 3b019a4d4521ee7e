//! CLI commands.

mod parse;
mod plan;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::output::OutputFormat;

/// spread CLI - Plan replica placement across workload subsets.
#[derive(Debug, Parser)]
#[command(name = "spread")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format (table or json).
    #[arg(long, global = true, env = "SPREAD_FORMAT")]
    format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compute the per-subset allocation for a workload file.
    Plan(plan::PlanCommand),

    /// Resolve replica specs against a total.
    Parse(parse::ParseCommand),

    /// Show CLI version.
    Version,
}

impl Cli {
    /// Run the CLI command.
    pub fn run(self) -> Result<()> {
        let config = Config::load()?;
        config.init_tracing();

        let format = match self.format.as_deref().or(config.format.as_deref()) {
            Some(raw) => raw.parse::<OutputFormat>()?,
            None => OutputFormat::default(),
        };

        let ctx = CommandContext { format };

        match self.command {
            Commands::Plan(cmd) => cmd.run(ctx),
            Commands::Parse(cmd) => cmd.run(ctx),
            Commands::Version => {
                println!("spread {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

/// Shared command context.
pub struct CommandContext {
    pub format: OutputFormat,
}
