//! Per-room seat chart.

use std::collections::{BTreeMap, BTreeSet};

use seatplan_allocator::{BlockedSeats, Room};
use seatplan_id::{BatchKey, RoomId, Seat, StudentId};
use seatplan_ledger::AssignmentLedger;
use seatplan_roster::Roster;
use serde::Serialize;
use tracing::debug;

/// One grid position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeatCell {
    Blocked,
    Empty,
    Occupied {
        student_id: StudentId,
        batch_key: BatchKey,
        label: String,
    },
}

impl SeatCell {
    /// Text printed in the chart cell.
    pub fn text(&self) -> &str {
        match self {
            SeatCell::Blocked => "X",
            SeatCell::Empty => "",
            SeatCell::Occupied { label, .. } => label.as_str(),
        }
    }
}

/// Per-batch footer line: count and the first and last student seated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchLine {
    pub batch_key: BatchKey,
    pub count: usize,
    pub first: StudentId,
    pub last: StudentId,
}

impl std::fmt::Display for BatchLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} = {} = ({}-{})",
            self.batch_key, self.count, self.first, self.last
        )
    }
}

/// Seat chart for one room.
///
/// `grid[r][c]` is row `r + 1`, column `c + 1`. Headers are printed over the
/// columns in the same order but numbered `C{columns}` down to `C1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatChart {
    pub room_id: RoomId,
    pub rows: u32,
    pub columns: u32,
    /// Seats left once blocked positions are removed.
    pub capacity: usize,
    pub column_headers: Vec<String>,
    /// Batches seated in each column, sorted and joined with `+`.
    pub column_batches: Vec<String>,
    pub grid: Vec<Vec<SeatCell>>,
    pub footer: Vec<BatchLine>,
}

impl SeatChart {
    /// Build the chart for `room` from the ledger.
    pub fn build(
        room: &Room,
        ledger: &AssignmentLedger,
        roster: &Roster,
        mask: &BlockedSeats,
    ) -> Self {
        let capacity = room.capacity(mask);
        debug!(room_id = %room.id, capacity, "building seat chart");

        let mut grid = Vec::with_capacity(room.rows as usize);
        for row in 1..=room.rows {
            let mut cells = Vec::with_capacity(room.columns as usize);
            for column in 1..=room.columns {
                cells.push(cell_at(room, row, column, ledger, roster, mask));
            }
            grid.push(cells);
        }

        let mut per_column: Vec<BTreeSet<&BatchKey>> =
            vec![BTreeSet::new(); room.columns as usize];
        let mut per_batch: BTreeMap<&BatchKey, Vec<&StudentId>> = BTreeMap::new();
        for assignment in ledger.by_room(&room.id) {
            if let Some(set) = assignment
                .column()
                .checked_sub(1)
                .and_then(|c| per_column.get_mut(c as usize))
            {
                set.insert(&assignment.batch_key);
            }
            per_batch
                .entry(&assignment.batch_key)
                .or_default()
                .push(&assignment.student_id);
        }

        let column_batches = per_column
            .into_iter()
            .map(|set| {
                set.into_iter()
                    .map(BatchKey::as_str)
                    .collect::<Vec<_>>()
                    .join("+")
            })
            .collect();

        let footer = per_batch
            .into_iter()
            .filter_map(|(batch, students)| {
                let first = students.first()?;
                let last = students.last()?;
                Some(BatchLine {
                    batch_key: batch.clone(),
                    count: students.len(),
                    first: (*first).clone(),
                    last: (*last).clone(),
                })
            })
            .collect();

        Self {
            room_id: room.id.clone(),
            rows: room.rows,
            columns: room.columns,
            capacity,
            column_headers: (1..=room.columns).rev().map(|c| format!("C{c}")).collect(),
            column_batches,
            grid,
            footer,
        }
    }

    /// Occupied cells.
    pub fn seated(&self) -> usize {
        self.grid
            .iter()
            .flatten()
            .filter(|cell| matches!(cell, SeatCell::Occupied { .. }))
            .count()
    }

    /// Cell at a 1-based coordinate.
    pub fn cell(&self, row: u32, column: u32) -> Option<&SeatCell> {
        let r = row.checked_sub(1)? as usize;
        let c = column.checked_sub(1)? as usize;
        self.grid.get(r)?.get(c)
    }
}

fn cell_at(
    room: &Room,
    row: u32,
    column: u32,
    ledger: &AssignmentLedger,
    roster: &Roster,
    mask: &BlockedSeats,
) -> SeatCell {
    if mask.is_blocked(&room.id, row, column) {
        return SeatCell::Blocked;
    }
    let Ok(seat) = Seat::new(row, column) else {
        return SeatCell::Empty;
    };
    match ledger.at(&room.id, seat) {
        Some(assignment) => SeatCell::Occupied {
            student_id: assignment.student_id.clone(),
            batch_key: assignment.batch_key.clone(),
            label: seat_label(&assignment.student_id, roster),
        },
        None => SeatCell::Empty,
    }
}

/// `"{id} ({m_batch} {section})"` for cross-batch students, else
/// `"{id} ({section})"`. Students missing from the roster show the bare id.
fn seat_label(student: &StudentId, roster: &Roster) -> String {
    match roster.get(student) {
        Some(s) if s.is_cross_batch() => {
            format!("{} ({} {})", student, s.m_batch_label(), s.section)
        }
        Some(s) => format!("{} ({})", student, s.section),
        None => student.to_string(),
    }
}
