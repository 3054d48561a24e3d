//! Blocked-seat mask.

use std::collections::{BTreeMap, BTreeSet};

use seatplan_id::{RoomId, Seat};
use serde::{Deserialize, Serialize};

/// Rooms with seats that are physically unusable, and which ones.
const BUILTIN_BLOCKED: &[(&str, &[(u32, u32)])] = &[
    ("A002", &[(1, 1), (1, 5), (6, 1), (6, 5)]),
    ("A008", &[(1, 1), (1, 5), (6, 1), (6, 5)]),
];

/// Room-scoped set of unusable seat coordinates.
///
/// Lookups are pure: unknown rooms and coordinates are simply not blocked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockedSeats {
    table: BTreeMap<RoomId, BTreeSet<Seat>>,
}

impl BlockedSeats {
    /// A mask with no blocked seats.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in table of known unusable seats.
    pub fn builtin() -> Self {
        let mut mask = Self::empty();
        for (room, seats) in BUILTIN_BLOCKED {
            let Ok(room) = RoomId::parse(room) else {
                continue;
            };
            for &(row, column) in seats.iter() {
                if let Ok(seat) = Seat::new(row, column) {
                    mask.table.entry(room.clone()).or_default().insert(seat);
                }
            }
        }
        mask
    }

    /// Build a mask from explicit entries.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (RoomId, S)>,
        S: IntoIterator<Item = Seat>,
    {
        let mut mask = Self::empty();
        for (room, seats) in entries {
            mask.table.entry(room).or_default().extend(seats);
        }
        mask
    }

    /// Add every entry of `other` to this mask.
    pub fn merge(mut self, other: &BlockedSeats) -> Self {
        for (room, seats) in &other.table {
            self.table
                .entry(room.clone())
                .or_default()
                .extend(seats.iter().copied());
        }
        self
    }

    /// Returns true if the coordinate is unusable.
    pub fn is_blocked(&self, room: &RoomId, row: u32, column: u32) -> bool {
        let Ok(seat) = Seat::new(row, column) else {
            return false;
        };
        self.is_seat_blocked(room, seat)
    }

    /// Returns true if the seat is unusable.
    pub fn is_seat_blocked(&self, room: &RoomId, seat: Seat) -> bool {
        self.table
            .get(room)
            .is_some_and(|seats| seats.contains(&seat))
    }

    /// Number of blocked seats inside a `rows` x `columns` grid.
    pub fn blocked_in(&self, room: &RoomId, rows: u32, columns: u32) -> usize {
        self.table.get(room).map_or(0, |seats| {
            seats
                .iter()
                .filter(|s| s.row() <= rows && s.column() <= columns)
                .count()
        })
    }

    /// Blocked seats of a room, in (row, column) order.
    pub fn seats(&self, room: &RoomId) -> impl Iterator<Item = Seat> + '_ {
        self.table.get(room).into_iter().flatten().copied()
    }

    /// Rooms that have at least one blocked seat.
    pub fn rooms(&self) -> impl Iterator<Item = &RoomId> {
        self.table.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(s: &str) -> RoomId {
        RoomId::parse(s).unwrap()
    }

    #[test]
    fn test_builtin_corners() {
        let mask = BlockedSeats::builtin();
        assert!(mask.is_blocked(&room("A002"), 1, 1));
        assert!(mask.is_blocked(&room("A008"), 6, 5));
        assert!(!mask.is_blocked(&room("A002"), 2, 2));
        assert_eq!(mask.blocked_in(&room("A002"), 6, 5), 4);
    }

    #[test]
    fn test_unknown_room_not_blocked() {
        let mask = BlockedSeats::builtin();
        assert!(!mask.is_blocked(&room("B101"), 1, 1));
        assert!(!mask.is_blocked(&room("A002"), 0, 0));
    }

    #[test]
    fn test_blocked_in_ignores_seats_outside_grid() {
        let mask = BlockedSeats::builtin();
        assert_eq!(mask.blocked_in(&room("A002"), 5, 5), 2);
    }

    #[test]
    fn test_merge_extends_rooms() {
        let extra = BlockedSeats::from_entries([(room("101"), [Seat::new(2, 3).unwrap()])]);
        let mask = BlockedSeats::builtin().merge(&extra);
        assert!(mask.is_blocked(&room("101"), 2, 3));
        assert!(mask.is_blocked(&room("A002"), 1, 5));
    }

    #[test]
    fn test_deserialize_from_pairs() {
        let mask: BlockedSeats = serde_json::from_str(r#"{"101": [[1, 1], [2, 2]]}"#).unwrap();
        let seats: Vec<Seat> = mask.seats(&room("101")).collect();
        assert_eq!(seats.len(), 2);
        assert!(mask.is_blocked(&room("101"), 2, 2));
    }
}
