//! Error handling and display for the CLI.

use colored::Colorize;
use thiserror::Error;

use crate::workload::WorkloadError;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid workload {path}")]
    InvalidWorkload {
        path: String,
        #[source]
        source: WorkloadError,
    },

    #[error("Unsupported output format '{0}'")]
    UnsupportedFormat(String),
}

impl CliError {
    pub fn invalid_workload(path: impl Into<String>, source: WorkloadError) -> Self {
        Self::InvalidWorkload {
            path: path.into(),
            source,
        }
    }
}

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), err);

    for cause in err.chain().skip(1) {
        eprintln!("  {} {}", "caused by:".dimmed(), cause);
    }

    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        match cli_err {
            CliError::InvalidWorkload {
                source: WorkloadError::DuplicateSubset(_),
                ..
            } => {
                eprintln!(
                    "\n{}",
                    "Hint: Subset names must be unique within a workload.".yellow()
                );
            }
            CliError::InvalidWorkload {
                source: WorkloadError::EmptyTopology,
                ..
            } => {
                eprintln!(
                    "\n{}",
                    "Hint: Add at least one [[subsets]] entry with a name.".yellow()
                );
            }
            CliError::UnsupportedFormat(_) => {
                eprintln!(
                    "\n{}",
                    "Hint: Use --format table or --format json.".yellow()
                );
            }
            _ => {}
        }
    }
}
