//! spreadctl (spread) - CLI for planning replica placement
//!
//! Loads a workload file and prints how many replicas each subset should
//! run, using the same allocator the orchestrator reconciles with.

use anyhow::Result;
use clap::Parser;

mod commands;
mod config;
mod error;
mod output;
mod workload;

use commands::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = cli.run() {
        error::print_error(&e);
        std::process::exit(1);
    }

    Ok(())
}
