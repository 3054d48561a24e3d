//! Rooms and the room table.

use std::collections::HashSet;

use seatplan_id::RoomId;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{AllocationIssue, BlockedSeats};

/// A rectangular grid of seats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Room identifier.
    pub id: RoomId,

    /// Number of rows.
    pub rows: u32,

    /// Number of columns.
    pub columns: u32,
}

impl Room {
    /// Create a room.
    pub fn new(id: RoomId, rows: u32, columns: u32) -> Self {
        Self { id, rows, columns }
    }

    /// Returns true if the grid has at least one seat.
    pub fn has_seats(&self) -> bool {
        self.rows > 0 && self.columns > 0
    }

    /// Usable seats once blocked seats are removed.
    pub fn capacity(&self, mask: &BlockedSeats) -> usize {
        let total = self.rows as usize * self.columns as usize;
        total.saturating_sub(mask.blocked_in(&self.id, self.rows, self.columns))
    }
}

/// Ordered room reference data for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomTable {
    rooms: Vec<Room>,
}

impl RoomTable {
    /// Create a table from rooms in processing order.
    pub fn new(rooms: Vec<Room>) -> Self {
        Self { rooms }
    }

    /// Look up a room's capacity entry.
    pub fn get(&self, id: &RoomId) -> Option<&Room> {
        self.rooms.iter().find(|room| &room.id == id)
    }

    /// Rooms in table order.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Number of rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Returns true if the table has no rooms.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Usable seats across every room with a valid grid.
    pub fn total_capacity(&self, mask: &BlockedSeats) -> usize {
        self.rooms
            .iter()
            .filter(|room| room.has_seats())
            .map(|room| room.capacity(mask))
            .sum()
    }

    /// Resolve a processing order against the table.
    ///
    /// Ids without a capacity entry, and repeated ids, are skipped and
    /// reported. An empty `order` means table order.
    pub fn resolve(&self, order: &[RoomId]) -> (Vec<Room>, Vec<AllocationIssue>) {
        if order.is_empty() {
            return (self.rooms.clone(), Vec::new());
        }

        let mut resolved = Vec::with_capacity(order.len());
        let mut issues = Vec::new();
        let mut seen = HashSet::new();
        for id in order {
            if !seen.insert(id) {
                warn!(room_id = %id, "Room listed twice in processing order; skipping");
                issues.push(AllocationIssue::DuplicateRoom { room: id.clone() });
                continue;
            }
            match self.get(id) {
                Some(room) => resolved.push(room.clone()),
                None => {
                    warn!(room_id = %id, "Room not found in room data; skipping");
                    issues.push(AllocationIssue::UnknownRoom { room: id.clone() });
                }
            }
        }
        (resolved, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(id: &str, rows: u32, columns: u32) -> Room {
        Room::new(RoomId::parse(id).unwrap(), rows, columns)
    }

    fn id(s: &str) -> RoomId {
        RoomId::parse(s).unwrap()
    }

    #[test]
    fn test_capacity_subtracts_blocked() {
        let mask = BlockedSeats::builtin();
        assert_eq!(room("A002", 6, 5).capacity(&mask), 26);
        assert_eq!(room("101", 6, 5).capacity(&mask), 30);
    }

    #[test]
    fn test_total_capacity_ignores_empty_grids() {
        let table = RoomTable::new(vec![room("101", 2, 2), room("102", 0, 4)]);
        assert_eq!(table.total_capacity(&BlockedSeats::empty()), 4);
    }

    #[test]
    fn test_resolve_default_order() {
        let table = RoomTable::new(vec![room("101", 2, 2), room("102", 3, 1)]);
        let (rooms, issues) = table.resolve(&[]);
        assert_eq!(rooms.len(), 2);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_resolve_skips_unknown_and_duplicate() {
        let table = RoomTable::new(vec![room("101", 2, 2), room("102", 3, 1)]);
        let (rooms, issues) = table.resolve(&[id("102"), id("999"), id("102"), id("101")]);
        let ids: Vec<&str> = rooms.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["102", "101"]);
        assert_eq!(issues.len(), 2);
        assert!(matches!(issues[0], AllocationIssue::UnknownRoom { .. }));
        assert!(matches!(issues[1], AllocationIssue::DuplicateRoom { .. }));
        assert!(issues.iter().all(AllocationIssue::is_configuration_error));
    }
}
