//! Seat chart command.

use anyhow::Result;
use clap::Args;
use seatplan_allocator::Room;
use seatplan_reports::SeatChart;
use tabled::builder::Builder;

use crate::error::CliError;
use crate::output::{print_heading, print_single, OutputFormat};
use crate::plan::RunContext;

use super::{print_session_header, CommandContext, PlanArgs};

const SIDE_LABEL: &str = "Batch/Sl. No.";

/// Print seat charts for the rooms that were filled.
#[derive(Debug, Args)]
pub struct ChartCommand {
    #[command(flatten)]
    plan: PlanArgs,

    /// Only chart this room (also works for rooms left empty).
    #[arg(long, value_name = "ID")]
    room: Option<String>,
}

impl ChartCommand {
    pub fn run(self, ctx: CommandContext) -> Result<()> {
        let run = self.plan.load(&ctx)?;
        let charts = build_charts(&run, self.room.as_deref())?;

        match ctx.format {
            OutputFormat::Json => print_single(&charts),
            OutputFormat::Table => {
                print_session_header(&run.session);
                for chart in &charts {
                    print_chart(chart);
                }
            }
        }
        Ok(())
    }
}

fn build_charts(run: &RunContext, only: Option<&str>) -> Result<Vec<SeatChart>> {
    let outcome = run.allocate();
    let rooms: Vec<&Room> = match only {
        Some(id) => vec![run
            .room(id)
            .ok_or_else(|| CliError::UnknownRoom(id.to_string()))?],
        None => outcome
            .rooms
            .iter()
            .filter_map(|report| run.table.get(&report.room_id))
            .collect(),
    };
    Ok(rooms
        .into_iter()
        .map(|room| SeatChart::build(room, &outcome.ledger, &run.roster, &run.mask))
        .collect())
}

fn print_chart(chart: &SeatChart) {
    print_heading(&format!(
        "Room #{}    Capacity = {}",
        chart.room_id, chart.capacity
    ));

    let mut builder = Builder::default();

    let mut header = vec![String::new()];
    header.extend(chart.column_headers.iter().cloned());
    header.push(String::new());
    builder.push_record(header);

    let mut batches = vec![SIDE_LABEL.to_string()];
    batches.extend(chart.column_batches.iter().cloned());
    batches.push(SIDE_LABEL.to_string());
    builder.push_record(batches);

    for (i, cells) in chart.grid.iter().enumerate() {
        let row = (i + 1).to_string();
        let mut record = vec![row.clone()];
        record.extend(cells.iter().map(|cell| cell.text().to_string()));
        record.push(row);
        builder.push_record(record);
    }

    println!("{}", builder.build());
    for line in &chart.footer {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::tests::{settings, SAMPLE};
    use crate::plan::RunPlan;

    fn context() -> RunContext {
        let plan = RunPlan::from_toml_str(SAMPLE).unwrap();
        RunContext::from_plan(&plan, &settings()).unwrap()
    }

    #[test]
    fn test_charts_cover_filled_rooms() {
        let charts = build_charts(&context(), None).unwrap();
        let rooms: Vec<&str> = charts.iter().map(|c| c.room_id.as_str()).collect();
        assert_eq!(rooms, vec!["102"]);
        assert_eq!(charts[0].seated(), 3);
    }

    #[test]
    fn test_single_room_chart() {
        let charts = build_charts(&context(), Some("101")).unwrap();
        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].seated(), 0);
    }

    #[test]
    fn test_unknown_room() {
        let err = build_charts(&context(), Some("999")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::UnknownRoom(_))
        ));
    }
}
