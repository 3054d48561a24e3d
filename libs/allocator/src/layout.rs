//! Column partitioning for two-batch rooms.

use seatplan_id::{RoomId, Seat};

use crate::BlockedSeats;

/// A room's columns split into two interleaved halves.
///
/// Columns are 1-based and listed in descending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPartitions {
    /// Columns whose 0-based index shares parity with the last column.
    pub primary: Vec<u32>,

    /// The remaining columns.
    pub secondary: Vec<u32>,
}

/// Split `columns` into primary and secondary halves by parity.
///
/// The last column is always primary, so a pairing fills the rightmost
/// column from the primary batch and alternates leftwards.
pub fn column_partitions(columns: u32) -> ColumnPartitions {
    let mut primary = Vec::new();
    let mut secondary = Vec::new();
    if columns == 0 {
        return ColumnPartitions { primary, secondary };
    }
    let last_parity = (columns - 1) % 2;
    for index in (0..columns).rev() {
        if index % 2 == last_parity {
            primary.push(index + 1);
        } else {
            secondary.push(index + 1);
        }
    }
    ColumnPartitions { primary, secondary }
}

/// Usable seats in the given columns, column by column, rows ascending.
pub(crate) fn open_seats(
    room: &RoomId,
    rows: u32,
    columns: &[u32],
    mask: &BlockedSeats,
) -> Vec<Seat> {
    let mut seats = Vec::with_capacity(columns.len() * rows as usize);
    for &column in columns {
        for row in 1..=rows {
            if mask.is_blocked(room, row, column) {
                continue;
            }
            if let Ok(seat) = Seat::new(row, column) {
                seats.push(seat);
            }
        }
    }
    seats
}
