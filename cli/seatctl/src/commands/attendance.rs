//! Attendance command.

use anyhow::Result;
use clap::Args;
use seatplan_reports::{attendance_groups, AttendanceGroup};
use tabled::Tabled;

use crate::output::{print_heading, print_single, print_table, OutputFormat};

use super::{print_session_header, CommandContext, PlanArgs};

/// Print attendance groups by faculty, batch and section.
#[derive(Debug, Args)]
pub struct AttendanceCommand {
    #[command(flatten)]
    plan: PlanArgs,
}

#[derive(Debug, Tabled)]
struct EntryRow {
    #[tabled(rename = "Sl.")]
    serial: usize,

    #[tabled(rename = "Student ID")]
    student: String,

    #[tabled(rename = "Name")]
    name: String,

    #[tabled(rename = "M Batch")]
    m_batch: String,
}

impl AttendanceCommand {
    pub fn run(self, ctx: CommandContext) -> Result<()> {
        let run = self.plan.load(&ctx)?;
        let outcome = run.allocate();
        let groups = attendance_groups(&run.roster, &outcome.ledger);

        match ctx.format {
            OutputFormat::Json => print_single(&groups),
            OutputFormat::Table => {
                print_session_header(&run.session);
                for group in &groups {
                    print_group(group);
                }
            }
        }
        Ok(())
    }
}

fn group_title(group: &AttendanceGroup) -> String {
    let mut title = format!(
        "{} | Batch {} | Section {}",
        group.faculty_name, group.batch, group.section
    );
    if !group.course_code.is_empty() {
        title.push_str(&format!(" | {} {}", group.course_code, group.course_title));
    }
    title
}

fn print_group(group: &AttendanceGroup) {
    for room in &group.rooms {
        print_heading(&format!(
            "{} | Room {} ({})",
            group_title(group),
            room.room_id,
            room.students.len()
        ));
        let rows: Vec<EntryRow> = room
            .students
            .iter()
            .enumerate()
            .map(|(i, entry)| EntryRow {
                serial: i + 1,
                student: entry.student_id.to_string(),
                name: entry.name.clone(),
                m_batch: entry.m_batch.clone(),
            })
            .collect();
        print_table(&rows);
    }
}
