//! seatctl - plan exam seating from a run plan file.
//!
//! Loads rooms, blocked seats and the student roster from a TOML or JSON
//! plan, runs the two-phase allocator and prints assignments or one of the
//! derived reports.

use clap::Parser;

mod commands;
mod config;
mod error;
mod logging;
mod output;
mod plan;

use commands::Cli;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = cli.run() {
        error::print_error(&e);
        std::process::exit(error::exit_code(&e));
    }
}
