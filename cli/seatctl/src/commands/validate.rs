//! Validate command.
//!
//! Checks a plan offline: room dimensions, the processing order, blocked
//! seats and the roster. Capacity is compared with the student count.

use std::collections::HashSet;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::error::CliError;
use crate::output::{print_info, print_single, print_success, print_table, OutputFormat};
use crate::plan::{RunContext, RunPlan};

use super::{CommandContext, PlanArgs};

/// Check a plan without allocating.
#[derive(Debug, Args)]
pub struct ValidateCommand {
    #[command(flatten)]
    plan: PlanArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Tabled)]
struct Finding {
    #[tabled(rename = "Level")]
    severity: Severity,

    #[tabled(rename = "Finding")]
    message: String,
}

impl Finding {
    fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ValidationReport {
    valid: bool,
    rooms: usize,
    capacity: usize,
    students: usize,
    findings: Vec<Finding>,
}

impl ValidateCommand {
    pub fn run(self, ctx: CommandContext) -> Result<()> {
        let plan = RunPlan::load(&self.plan.plan).map_err(CliError::from)?;
        let run = RunContext::from_plan(&plan, &ctx.settings).map_err(CliError::from)?;
        let report = check(&plan, &run);

        match ctx.format {
            OutputFormat::Json => print_single(&report),
            OutputFormat::Table => {
                if !report.findings.is_empty() {
                    print_table(&report.findings);
                }
                print_info(&format!(
                    "{} room(s), capacity {}, {} student(s)",
                    report.rooms, report.capacity, report.students
                ));
            }
        }

        if !report.valid {
            let count = report
                .findings
                .iter()
                .filter(|f| f.severity == Severity::Error)
                .count();
            return Err(CliError::InvalidPlan {
                path: self.plan.plan,
                count,
            }
            .into());
        }
        if ctx.format == OutputFormat::Table {
            print_success(&format!("Plan is valid: {}", self.plan.plan.display()));
        }
        Ok(())
    }
}

fn check(plan: &RunPlan, run: &RunContext) -> ValidationReport {
    let mut findings = Vec::new();

    let mut ids = HashSet::new();
    for room in &plan.rooms {
        if !ids.insert(&room.id) {
            findings.push(Finding::error(format!("room {} is defined twice", room.id)));
        }
        if !room.has_seats() {
            findings.push(Finding::error(format!(
                "room {} has an empty grid ({}x{})",
                room.id, room.rows, room.columns
            )));
        }
    }

    for issue in &run.issues {
        findings.push(Finding::error(issue.to_string()));
    }

    for (room_id, seats) in &plan.blocked {
        let Some(room) = run.table.get(room_id) else {
            findings.push(Finding::warning(format!(
                "blocked seats listed for unknown room {room_id}"
            )));
            continue;
        };
        for seat in seats {
            if seat.row() > room.rows || seat.column() > room.columns {
                findings.push(Finding::warning(format!(
                    "blocked seat {seat} is outside room {room_id} ({}x{})",
                    room.rows, room.columns
                )));
            }
        }
    }

    if plan.has_both_student_sources() {
        findings.push(Finding::warning(
            "plan has both students and batches; batches are ignored",
        ));
    }
    for err in &run.roster.report().errors {
        findings.push(Finding::warning(err.to_string()));
    }

    let capacity = run.capacity();
    let students = run.queues.total_remaining();
    if students == 0 {
        findings.push(Finding::warning("plan has no students"));
    } else if capacity < students {
        findings.push(Finding::warning(format!(
            "capacity {capacity} is short of {students} student(s) by {}",
            students - capacity
        )));
    }

    ValidationReport {
        valid: !findings.iter().any(|f| f.severity == Severity::Error),
        rooms: run.rooms.len(),
        capacity,
        students,
        findings,
    }
}
