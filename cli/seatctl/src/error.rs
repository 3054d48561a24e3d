//! Error handling and display for the CLI.

use std::path::PathBuf;

use colored::Colorize;
use thiserror::Error;

use crate::plan::PlanError;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{remaining} student(s) could not be seated")]
    Shortfall { remaining: usize },

    #[error("room {0} is not in the plan")]
    UnknownRoom(String),

    #[error("plan {path} failed validation ({count} error(s))")]
    InvalidPlan { path: PathBuf, count: usize },

    #[error(transparent)]
    Plan(#[from] PlanError),
}

impl CliError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Shortfall { .. } => 2,
            _ => 1,
        }
    }
}

/// Exit status for any error returned by a command.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<CliError>().map_or(1, CliError::exit_code)
}

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), err);
    for cause in err.chain().skip(1) {
        eprintln!("  {} {}", "caused by:".dimmed(), cause);
    }

    // Check for specific error types and provide hints
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        match cli_err {
            CliError::Shortfall { .. } => {
                eprintln!(
                    "\n{}",
                    "Hint: Add rooms or unblock seats, or drop --strict to accept a partial plan."
                        .yellow()
                );
            }
            CliError::UnknownRoom(_) => {
                eprintln!(
                    "\n{}",
                    "Hint: Run `seatctl validate --plan <PATH>` to list the plan's rooms.".yellow()
                );
            }
            CliError::InvalidPlan { .. } => {}
            CliError::Plan(PlanError::Read { .. }) => {
                eprintln!("\n{}", "Hint: Check the --plan path.".yellow());
            }
            CliError::Plan(_) => {
                eprintln!(
                    "\n{}",
                    "Hint: Plans ending in .json are read as JSON, anything else as TOML."
                        .yellow()
                );
            }
        }
    }
}
