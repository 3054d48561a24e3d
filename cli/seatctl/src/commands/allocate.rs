//! Allocate command.

use std::collections::BTreeMap;

use anyhow::Result;
use clap::Args;
use seatplan_allocator::{AllocationOutcome, Phase, RoomReport};
use seatplan_id::{BatchKey, StudentId};
use seatplan_ledger::SeatAssignment;
use serde::Serialize;
use tabled::Tabled;

use crate::error::CliError;
use crate::output::{
    display_option, print_heading, print_info, print_single, print_success, print_table,
    print_warning, OutputFormat,
};

use super::{CommandContext, PlanArgs};

/// Run the allocator over a plan.
#[derive(Debug, Args)]
pub struct AllocateCommand {
    #[command(flatten)]
    plan: PlanArgs,

    /// Exit with status 2 if any student is left unseated.
    #[arg(long)]
    strict: bool,
}

#[derive(Debug, Tabled)]
struct AssignmentRow {
    #[tabled(rename = "Room")]
    room: String,

    #[tabled(rename = "Row")]
    row: u32,

    #[tabled(rename = "Col")]
    column: u32,

    #[tabled(rename = "Student")]
    student: String,

    #[tabled(rename = "Batch")]
    batch: String,
}

#[derive(Debug, Tabled)]
struct RoomRow {
    #[tabled(rename = "Room")]
    room: String,

    #[tabled(rename = "Phase")]
    phase: Phase,

    #[tabled(rename = "Capacity")]
    capacity: usize,

    #[tabled(rename = "Seated")]
    seated: usize,

    #[tabled(rename = "Batches")]
    batches: String,
}

#[derive(Debug, Tabled)]
struct ResidualRow {
    #[tabled(rename = "Batch")]
    batch: String,

    #[tabled(rename = "Remaining")]
    remaining: usize,

    #[tabled(rename = "Next", display = "display_option")]
    next: Option<String>,
}

/// JSON shape of an allocation run.
#[derive(Debug, Serialize)]
struct AllocationReport<'a> {
    assignments: &'a [SeatAssignment],
    rooms: &'a [RoomReport],
    issues: Vec<String>,
    residual: &'a BTreeMap<BatchKey, Vec<StudentId>>,
    final_phase: Phase,
    phase_switched_at: Option<String>,
    seated: usize,
    shortfall: usize,
    digest: String,
}

impl AllocateCommand {
    pub fn run(self, ctx: CommandContext) -> Result<()> {
        let run = self.plan.load(&ctx)?;
        let outcome = run.allocate();

        match ctx.format {
            OutputFormat::Json => print_single(&report(&outcome)),
            OutputFormat::Table => print_tables(&outcome),
        }

        let shortfall = outcome.shortfall();
        if shortfall > 0 {
            if self.strict {
                return Err(CliError::Shortfall {
                    remaining: shortfall,
                }
                .into());
            }
            print_warning(&format!("{shortfall} student(s) could not be seated"));
        }
        Ok(())
    }
}

fn report(outcome: &AllocationOutcome) -> AllocationReport<'_> {
    AllocationReport {
        assignments: outcome.assignments(),
        rooms: &outcome.rooms,
        issues: outcome.issues.iter().map(ToString::to_string).collect(),
        residual: &outcome.residual,
        final_phase: outcome.final_phase,
        phase_switched_at: outcome.phase_switched_at().map(ToString::to_string),
        seated: outcome.ledger.len(),
        shortfall: outcome.shortfall(),
        digest: outcome.ledger.digest().to_string(),
    }
}

fn print_tables(outcome: &AllocationOutcome) {
    let assignments: Vec<AssignmentRow> = outcome
        .assignments()
        .iter()
        .map(|a| AssignmentRow {
            room: a.room_id.to_string(),
            row: a.row(),
            column: a.column(),
            student: a.student_id.to_string(),
            batch: a.batch_key.to_string(),
        })
        .collect();
    print_heading("Assignments");
    print_table(&assignments);

    let rooms: Vec<RoomRow> = outcome
        .rooms
        .iter()
        .map(|r| RoomRow {
            room: r.room_id.to_string(),
            phase: r.phase,
            capacity: r.capacity,
            seated: r.seated,
            batches: r
                .batches
                .iter()
                .map(BatchKey::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect();
    print_heading("Rooms");
    print_table(&rooms);

    if !outcome.issues.is_empty() {
        print_heading("Diagnostics");
        for issue in &outcome.issues {
            print_warning(&issue.to_string());
        }
    }

    if !outcome.residual.is_empty() {
        let residual: Vec<ResidualRow> = outcome
            .residual
            .iter()
            .map(|(batch, students)| ResidualRow {
                batch: batch.to_string(),
                remaining: students.len(),
                next: students.first().map(ToString::to_string),
            })
            .collect();
        print_heading("Unseated");
        print_table(&residual);
    }

    println!();
    if let Some(room) = outcome.phase_switched_at() {
        print_info(&format!("leftover mode from room {room}"));
    }
    print_info(&format!("digest: {}", outcome.ledger.digest()));
    if outcome.is_complete() {
        print_success(&format!("seated {} student(s)", outcome.ledger.len()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::tests::{settings, SAMPLE};
    use crate::plan::{RunContext, RunPlan};

    #[test]
    fn test_report_shape() {
        let plan = RunPlan::from_toml_str(SAMPLE).unwrap();
        let run = RunContext::from_plan(&plan, &settings()).unwrap();
        let outcome = run.allocate();

        let value = serde_json::to_value(report(&outcome)).unwrap();
        assert_eq!(value["seated"], 3);
        assert_eq!(value["shortfall"], 0);
        assert_eq!(value["final_phase"], "two_batch");
        assert_eq!(value["assignments"][0]["room_id"], "102");
        assert!(value["digest"].as_str().unwrap().starts_with("sha256:"));
    }

    #[test]
    fn test_digest_stable_across_runs() {
        let plan = RunPlan::from_toml_str(SAMPLE).unwrap();
        let run = RunContext::from_plan(&plan, &settings()).unwrap();
        assert_eq!(run.allocate().ledger.digest(), run.allocate().ledger.digest());
    }
}
