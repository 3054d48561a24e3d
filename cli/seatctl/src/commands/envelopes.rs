//! Envelopes command.

use anyhow::Result;
use clap::Args;
use seatplan_reports::envelope_list;
use serde::Serialize;
use tabled::Tabled;

use crate::output::print_output;

use super::{CommandContext, PlanArgs};

/// Print one envelope per faculty and course.
#[derive(Debug, Args)]
pub struct EnvelopesCommand {
    #[command(flatten)]
    plan: PlanArgs,
}

#[derive(Debug, Serialize, Tabled)]
struct EnvelopeRow {
    #[tabled(rename = "Faculty")]
    faculty_name: String,

    #[tabled(rename = "Course Code")]
    course_code: String,

    #[tabled(rename = "Course Title")]
    course_title: String,

    #[tabled(rename = "Exam Date")]
    exam_date: String,

    #[tabled(rename = "Time")]
    exam_time: String,
}

impl EnvelopesCommand {
    pub fn run(self, ctx: CommandContext) -> Result<()> {
        let run = self.plan.load(&ctx)?;
        let exam_date = run.session.formatted_date();
        let rows: Vec<EnvelopeRow> = envelope_list(&run.roster)
            .into_iter()
            .map(|e| EnvelopeRow {
                faculty_name: e.faculty_name,
                course_code: e.course_code,
                course_title: e.course_title,
                exam_date: exam_date.clone(),
                exam_time: run.session.exam_time.clone(),
            })
            .collect();
        print_output(&rows, ctx.format);
        Ok(())
    }
}
