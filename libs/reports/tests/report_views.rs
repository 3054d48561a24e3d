//! End-to-end: roster to allocation to every report view.

use seatplan_allocator::{BlockedSeats, Phase, SeatAllocator};
use seatplan_ledger::AssignmentLedger;
use seatplan_reports::{attendance_groups, envelope_list, SeatChart, Summary, DEFAULT_DAY_MARKER};
use seatplan_roster::{Roster, StudentRecord};
use seatplan_testing::room;

fn record(id: &str, batch: &str, m_batch: &str, section: &str) -> StudentRecord {
    StudentRecord {
        id: id.to_string(),
        name: format!("Student {id}"),
        batch: batch.to_string(),
        m_batch: m_batch.to_string(),
        section: section.to_string(),
        faculty_name: format!("F{batch}"),
        course_code: format!("CE {batch}"),
        course_title: "Mechanics".to_string(),
        ..Default::default()
    }
}

fn roster() -> Roster {
    Roster::from_records(vec![
        record("2331381004", "57", "57", "A"),
        record("2231421003", "56", "55", "B"),
        record("2231381001", "56", "56", "A"),
        record("2331381005", "57", "57", "A"),
        record("2231381002", "56", "56", "A"),
    ])
}

fn seat(roster: &Roster) -> (Vec<seatplan_allocator::Room>, AssignmentLedger) {
    let rooms = vec![room("101", 2, 2), room("102", 1, 1)];
    let mut queues = roster.batch_queues();
    let outcome = SeatAllocator::new().run(&rooms, &mut queues, &BlockedSeats::empty());
    assert!(outcome.is_complete());
    assert_eq!(outcome.rooms[0].phase, Phase::TwoBatch);
    assert_eq!(outcome.rooms[1].phase, Phase::Leftover);
    (rooms, outcome.ledger)
}

#[test]
fn test_seat_chart() {
    let roster = roster();
    let (rooms, ledger) = seat(&roster);

    let chart = SeatChart::build(&rooms[0], &ledger, &roster, &BlockedSeats::empty());
    assert_eq!(chart.column_batches, vec!["57", "56"]);
    assert_eq!(chart.cell(1, 2).unwrap().text(), "2231381001 (A)");
    let footer: Vec<String> = chart.footer.iter().map(ToString::to_string).collect();
    assert_eq!(
        footer,
        vec![
            "56 = 2 = (2231381001-2231381002)",
            "57 = 2 = (2331381004-2331381005)",
        ]
    );

    let small = SeatChart::build(&rooms[1], &ledger, &roster, &BlockedSeats::empty());
    assert_eq!(small.cell(1, 1).unwrap().text(), "2231421003 (55 B)");
}

#[test]
fn test_summary() {
    let roster = roster();
    let (_, ledger) = seat(&roster);

    let summary = Summary::build(&ledger, &roster, DEFAULT_DAY_MARKER);
    let rooms: Vec<&str> = summary.rows.iter().map(|r| r.room_id.as_str()).collect();
    assert_eq!(rooms, vec!["101", "102"]);

    let first = &summary.rows[0];
    assert_eq!(
        first.cells[0].as_ref().unwrap().lines,
        vec!["(2231381001-2231381002) (A) (Day)"]
    );
    assert_eq!(
        first.cells[1].as_ref().unwrap().lines,
        vec!["(2331381004-2331381005) (A) (Day)"]
    );
    assert_eq!(
        summary.rows[1].cells[0].as_ref().unwrap().lines,
        vec!["2231421003 (55 B)"]
    );
    assert_eq!(summary.rows[1].cells[1], None);
    assert_eq!(summary.column_totals, vec![3, 2]);
    assert_eq!(summary.grand_total, 5);
}

#[test]
fn test_attendance_and_envelopes() {
    let roster = roster();
    let (_, ledger) = seat(&roster);

    let groups = attendance_groups(&roster, &ledger);
    let keys: Vec<(String, String, String)> = groups
        .iter()
        .map(|g| (g.faculty_name.clone(), g.batch.to_string(), g.section.clone()))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("F56".to_string(), "56".to_string(), "A".to_string()),
            ("F56".to_string(), "56".to_string(), "B".to_string()),
            ("F57".to_string(), "57".to_string(), "A".to_string()),
        ]
    );
    assert_eq!(groups[1].rooms[0].room_id.as_str(), "102");
    assert_eq!(groups[1].rooms[0].students[0].m_batch, "55");

    let envelopes = envelope_list(&roster);
    assert_eq!(envelopes.len(), 2);
    assert_eq!(envelopes[0].faculty_name, "F56");
}
