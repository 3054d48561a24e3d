//! Room by batch summary.

use std::collections::{BTreeMap, BTreeSet};

use seatplan_id::{BatchKey, RoomId, StudentId};
use seatplan_ledger::AssignmentLedger;
use seatplan_roster::Roster;
use serde::Serialize;

/// Registration sub-identifier that marks day-program students.
pub const DEFAULT_DAY_MARKER: &str = "38";

/// Students of one batch in one room.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SummaryCell {
    /// One line per sub-group, in seat order of first appearance.
    pub lines: Vec<String>,
    pub total: usize,
}

/// One room's cells, aligned with [`Summary::batches`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub room_id: RoomId,
    pub cells: Vec<Option<SummaryCell>>,
    pub total: usize,
}

/// Room by batch matrix with totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub batches: Vec<BatchKey>,
    pub rows: Vec<SummaryRow>,
    /// Per-batch totals, aligned with `batches`.
    pub column_totals: Vec<usize>,
    pub grand_total: usize,
}

/// Students sharing a line are grouped by these four fields.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SubgroupKey {
    same: bool,
    day: bool,
    m_batch: String,
    section: String,
}

impl Summary {
    /// Summarize the ledger. `day_marker` is compared against each student
    /// id's `[4..6]` sub-identifier.
    pub fn build(ledger: &AssignmentLedger, roster: &Roster, day_marker: &str) -> Self {
        let mut seen_batches = BTreeSet::new();
        let mut by_room: Vec<(RoomId, BTreeMap<BatchKey, Vec<&StudentId>>)> = Vec::new();

        for room in ledger.rooms() {
            let mut per_batch: BTreeMap<BatchKey, Vec<&StudentId>> = BTreeMap::new();
            for assignment in ledger.by_room(room) {
                seen_batches.insert(assignment.batch_key.clone());
                per_batch
                    .entry(assignment.batch_key.clone())
                    .or_default()
                    .push(&assignment.student_id);
            }
            by_room.push((room.clone(), per_batch));
        }
        sort_rooms(&mut by_room);

        let batches: Vec<BatchKey> = seen_batches.into_iter().collect();
        let mut column_totals = vec![0; batches.len()];
        let mut rows = Vec::with_capacity(by_room.len());

        for (room_id, per_batch) in by_room {
            let mut total = 0;
            let cells = batches
                .iter()
                .enumerate()
                .map(|(i, batch)| {
                    let students = per_batch.get(batch)?;
                    let cell = build_cell(batch, students, roster, day_marker);
                    column_totals[i] += cell.total;
                    total += cell.total;
                    Some(cell)
                })
                .collect();
            rows.push(SummaryRow {
                room_id,
                cells,
                total,
            });
        }

        let grand_total = column_totals.iter().sum();
        Self {
            batches,
            rows,
            column_totals,
            grand_total,
        }
    }
}

fn build_cell(
    batch: &BatchKey,
    students: &[&StudentId],
    roster: &Roster,
    day_marker: &str,
) -> SummaryCell {
    let mut groups: Vec<(SubgroupKey, Vec<&StudentId>)> = Vec::new();
    for &id in students {
        let key = subgroup_key(id, batch, roster, day_marker);
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, ids)) => ids.push(id),
            None => groups.push((key, vec![id])),
        }
    }

    let lines = groups
        .iter()
        .filter_map(|(key, ids)| subgroup_line(key, ids))
        .collect();
    SummaryCell {
        lines,
        total: students.len(),
    }
}

fn subgroup_key(id: &StudentId, batch: &BatchKey, roster: &Roster, day_marker: &str) -> SubgroupKey {
    let day = id.sub_identifier_str().as_deref() == Some(day_marker);
    match roster.get(id) {
        Some(student) => SubgroupKey {
            same: student.m_batch.as_ref().is_none_or(|m| m == batch),
            day,
            m_batch: student.m_batch_label().to_string(),
            section: student.section.clone(),
        },
        None => SubgroupKey {
            same: true,
            day,
            m_batch: String::new(),
            section: String::new(),
        },
    }
}

fn subgroup_line(key: &SubgroupKey, ids: &[&StudentId]) -> Option<String> {
    let first = ids.first()?;
    let last = ids.last()?;
    let span = if ids.len() > 1 {
        format!("({first}-{last})")
    } else {
        first.to_string()
    };
    let mut line = if key.same {
        format!("{span} ({})", key.section)
    } else {
        format!("{span} ({} {})", key.m_batch, key.section)
    };
    if key.day {
        line.push_str(" (Day)");
    }
    Some(line)
}

/// Numeric order when every room id is a number, otherwise lexical.
fn sort_rooms<T>(rooms: &mut [(RoomId, T)]) {
    let numeric: Option<Vec<u64>> = rooms.iter().map(|(id, _)| id.as_str().parse().ok()).collect();
    if numeric.is_some() {
        rooms.sort_by_key(|(id, _)| id.as_str().parse::<u64>().unwrap_or(u64::MAX));
    } else {
        rooms.sort_by(|(a, _), (b, _)| a.as_str().cmp(b.as_str()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seatplan_id::Seat;
    use seatplan_ledger::SeatAssignment;
    use seatplan_roster::StudentRecord;
    use seatplan_testing::{batch, room_id, student};

    fn record(id: &str, batch: &str, m_batch: &str, section: &str) -> StudentRecord {
        StudentRecord {
            id: id.to_string(),
            batch: batch.to_string(),
            m_batch: m_batch.to_string(),
            section: section.to_string(),
            ..Default::default()
        }
    }

    fn ledger(rows: &[(&str, u32, u32, &str, &str)]) -> AssignmentLedger {
        let (ledger, errors) = AssignmentLedger::from_assignments(rows.iter().map(
            |&(room, r, c, id, key)| {
                SeatAssignment::new(room_id(room), Seat::new(r, c).unwrap(), student(id), batch(key))
            },
        ));
        assert!(errors.is_empty());
        ledger
    }

    #[test]
    fn test_subgroup_lines() {
        let roster = Roster::from_records(vec![
            record("2231381001", "56", "56", "A"),
            record("2231381002", "56", "56", "A"),
            record("2231421003", "56", "55", "B"),
            record("2231421004", "56", "", "C"),
        ]);
        let ledger = ledger(&[
            ("101", 1, 1, "2231381001", "56"),
            ("101", 2, 1, "2231381002", "56"),
            ("101", 3, 1, "2231421003", "56"),
            ("101", 4, 1, "2231421004", "56"),
        ]);

        let summary = Summary::build(&ledger, &roster, DEFAULT_DAY_MARKER);
        let cell = summary.rows[0].cells[0].as_ref().unwrap();
        assert_eq!(
            cell.lines,
            vec![
                "(2231381001-2231381002) (A) (Day)",
                "2231421003 (55 B)",
                "2231421004 (C)",
            ]
        );
        assert_eq!(cell.total, 4);
    }

    #[test]
    fn test_totals_and_ordering() {
        let roster = Roster::default();
        let ledger = ledger(&[
            ("102", 1, 1, "x1", "10"),
            ("102", 1, 2, "y1", "9"),
            ("101", 1, 1, "x2", "10"),
            ("101", 2, 1, "x3", "10"),
        ]);

        let summary = Summary::build(&ledger, &roster, DEFAULT_DAY_MARKER);
        let rooms: Vec<&str> = summary.rows.iter().map(|r| r.room_id.as_str()).collect();
        assert_eq!(rooms, vec!["101", "102"]);
        assert_eq!(summary.batches, vec![batch("9"), batch("10")]);
        assert_eq!(summary.rows[0].cells[0], None);
        assert_eq!(summary.rows[0].total, 2);
        assert_eq!(summary.rows[1].total, 2);
        assert_eq!(summary.column_totals, vec![1, 3]);
        assert_eq!(summary.grand_total, 4);
    }

    #[test]
    fn test_mixed_room_ids_sort_lexically() {
        let ledger = ledger(&[("B2", 1, 1, "s1", "1"), ("10", 1, 1, "s2", "1"), ("9", 1, 1, "s3", "1")]);
        let summary = Summary::build(&ledger, &Roster::default(), DEFAULT_DAY_MARKER);
        let rooms: Vec<&str> = summary.rows.iter().map(|r| r.room_id.as_str()).collect();
        assert_eq!(rooms, vec!["10", "9", "B2"]);
    }

    #[test]
    fn test_custom_day_marker() {
        let ledger = ledger(&[("1", 1, 1, "2231421001", "1")]);
        let summary = Summary::build(&ledger, &Roster::default(), "42");
        let cell = summary.rows[0].cells[0].as_ref().unwrap();
        assert_eq!(cell.lines, vec!["2231421001 () (Day)"]);
    }
}
