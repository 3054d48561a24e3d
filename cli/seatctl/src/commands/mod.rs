//! CLI commands.

mod allocate;
mod attendance;
mod chart;
mod envelopes;
mod summary;
mod validate;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use seatplan_reports::SessionInfo;

use crate::config::Settings;
use crate::error::CliError;
use crate::output::OutputFormat;
use crate::plan::RunContext;

/// seatctl - Plan exam seating so neighbours sit with other batches.
#[derive(Debug, Parser)]
#[command(name = "seatctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format. Defaults to the `format` setting.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Settings file to use instead of the platform config directory.
    #[arg(long, global = true, value_name = "PATH")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Seat every student and print the assignments.
    Allocate(allocate::AllocateCommand),

    /// Print per-room seat charts.
    Chart(chart::ChartCommand),

    /// Print the room by batch summary.
    Summary(summary::SummaryCommand),

    /// Print attendance sheet groups.
    Attendance(attendance::AttendanceCommand),

    /// Print the question-paper envelope list.
    Envelopes(envelopes::EnvelopesCommand),

    /// Check a plan without allocating.
    Validate(validate::ValidateCommand),

    /// Show CLI version.
    Version,
}

impl Cli {
    /// Run the CLI command.
    pub fn run(self) -> Result<()> {
        let settings = Settings::load(self.settings.as_deref())?;
        crate::logging::init(&settings)?;

        let ctx = CommandContext {
            format: self.format.unwrap_or(settings.format),
            settings,
        };

        match self.command {
            Commands::Allocate(cmd) => cmd.run(ctx),
            Commands::Chart(cmd) => cmd.run(ctx),
            Commands::Summary(cmd) => cmd.run(ctx),
            Commands::Attendance(cmd) => cmd.run(ctx),
            Commands::Envelopes(cmd) => cmd.run(ctx),
            Commands::Validate(cmd) => cmd.run(ctx),
            Commands::Version => {
                println!("seatctl {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

/// Shared command context.
pub struct CommandContext {
    pub settings: Settings,
    pub format: OutputFormat,
}

/// The `--plan` argument shared by every plan-driven command.
#[derive(Debug, Args)]
pub struct PlanArgs {
    /// Run plan file (TOML, or JSON when the name ends in .json).
    #[arg(long, value_name = "PATH")]
    pub plan: PathBuf,
}

impl PlanArgs {
    /// Load and resolve the plan.
    pub fn load(&self, ctx: &CommandContext) -> Result<RunContext> {
        RunContext::load(&self.plan, &ctx.settings).map_err(|e| CliError::from(e).into())
    }
}

/// Print the session header lines that are set.
pub(crate) fn print_session_header(session: &SessionInfo) {
    if session.is_empty() {
        return;
    }
    for line in [&session.institution, &session.department] {
        if !line.is_empty() {
            println!("{line}");
        }
    }
    if !session.semester.is_empty() || !session.shift.is_empty() {
        println!("{}", session.title());
    }
    let date = session.formatted_date();
    if !date.is_empty() || !session.exam_time.is_empty() {
        println!("Exam Date: {date}    Time: {}", session.exam_time);
    }
    if !session.exam_day.is_empty() {
        println!("Day: {}", session.exam_day);
    }
}
