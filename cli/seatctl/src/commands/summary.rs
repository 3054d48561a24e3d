//! Summary command.

use anyhow::Result;
use clap::Args;
use seatplan_reports::{Summary, SummaryCell};
use tabled::builder::Builder;

use crate::output::{print_heading, print_single, OutputFormat};

use super::{print_session_header, CommandContext, PlanArgs};

/// Print the room by batch summary.
#[derive(Debug, Args)]
pub struct SummaryCommand {
    #[command(flatten)]
    plan: PlanArgs,
}

impl SummaryCommand {
    pub fn run(self, ctx: CommandContext) -> Result<()> {
        let run = self.plan.load(&ctx)?;
        let outcome = run.allocate();
        let summary = Summary::build(&outcome.ledger, &run.roster, &run.day_marker);

        match ctx.format {
            OutputFormat::Json => print_single(&summary),
            OutputFormat::Table => {
                print_session_header(&run.session);
                print_heading("Summary");
                println!("{}", summary_table(&summary));
            }
        }
        Ok(())
    }
}

fn cell_text(cell: &SummaryCell) -> String {
    let mut lines = cell.lines.clone();
    lines.push(format!("Total={}", cell.total));
    lines.join("\n")
}

fn summary_table(summary: &Summary) -> tabled::Table {
    let mut builder = Builder::default();

    let mut header = vec!["Room".to_string()];
    header.extend(summary.batches.iter().map(ToString::to_string));
    header.push("Total".to_string());
    builder.push_record(header);

    for row in &summary.rows {
        let mut record = vec![row.room_id.to_string()];
        record.extend(
            row.cells
                .iter()
                .map(|cell| cell.as_ref().map(cell_text).unwrap_or_default()),
        );
        record.push(row.total.to_string());
        builder.push_record(record);
    }

    let mut totals = vec!["Total".to_string()];
    totals.extend(summary.column_totals.iter().map(ToString::to_string));
    totals.push(summary.grand_total.to_string());
    builder.push_record(totals);

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_text() {
        let cell = SummaryCell {
            lines: vec!["(a-b) (A)".into(), "c (55 B)".into()],
            total: 3,
        };
        assert_eq!(cell_text(&cell), "(a-b) (A)\nc (55 B)\nTotal=3");
    }
}
