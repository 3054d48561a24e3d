//! Test fixtures for the seat planner crates.
//!
//! Builders keep test bodies short; the proptest strategies generate small
//! but awkward inputs (single-column rooms, heavy masks, lopsided batches).

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;
use seatplan_allocator::{BatchQueues, BlockedSeats, Room};
use seatplan_id::{BatchKey, RoomId, Seat, StudentId};
use seatplan_ledger::SeatAssignment;

/// Build a room.
pub fn room(id: &str, rows: u32, columns: u32) -> Room {
    Room::new(room_id(id), rows, columns)
}

/// Parse a room id.
pub fn room_id(id: &str) -> RoomId {
    RoomId::parse(id).expect("fixture room id")
}

/// Parse a batch key.
pub fn batch(key: &str) -> BatchKey {
    BatchKey::canonical(key).expect("fixture batch key")
}

/// Parse a student id.
pub fn student(id: &str) -> StudentId {
    StudentId::parse(id).expect("fixture student id")
}

/// Queues with `count` generated students per batch, named `{batch}-{n:03}`.
pub fn sized_queues(sizes: &[(&str, usize)]) -> BatchQueues {
    let mut queues = BatchQueues::new();
    for (key, count) in sizes {
        let key = batch(key);
        let students = (1..=*count).map(|n| student(&format!("{key}-{n:03}")));
        queues.extend(&key, students).expect("fixture students are unique");
    }
    queues
}

/// Queues with explicit student ids.
pub fn named_queues(batches: &[(&str, Vec<&str>)]) -> BatchQueues {
    let mut queues = BatchQueues::new();
    for (key, students) in batches {
        let key = batch(key);
        queues
            .extend(&key, students.iter().map(|s| student(s)))
            .expect("fixture students are unique");
    }
    queues
}

/// A mask blocking the given seats of one room.
pub fn mask(room: &str, seats: &[(u32, u32)]) -> BlockedSeats {
    BlockedSeats::from_entries([(
        room_id(room),
        seats
            .iter()
            .map(|&(r, c)| Seat::new(r, c).expect("fixture seat"))
            .collect::<Vec<_>>(),
    )])
}

/// Check the invariants every allocation must satisfy.
///
/// Returns a description of the first violation.
pub fn check_invariants(
    assignments: &[SeatAssignment],
    rooms: &[Room],
    mask: &BlockedSeats,
) -> Result<(), String> {
    let dims: HashMap<&RoomId, &Room> = rooms.iter().map(|r| (&r.id, r)).collect();
    let mut students = HashSet::new();
    let mut seats = HashSet::new();
    for a in assignments {
        if !students.insert(&a.student_id) {
            return Err(format!("student {} seated twice", a.student_id));
        }
        if !seats.insert((&a.room_id, a.seat)) {
            return Err(format!("seat {} in {} used twice", a.seat, a.room_id));
        }
        if mask.is_seat_blocked(&a.room_id, a.seat) {
            return Err(format!("blocked seat {} in {} assigned", a.seat, a.room_id));
        }
        let Some(room) = dims.get(&a.room_id) else {
            return Err(format!("assignment in unknown room {}", a.room_id));
        };
        if a.row() > room.rows || a.column() > room.columns {
            return Err(format!("seat {} outside room {}", a.seat, a.room_id));
        }
    }
    Ok(())
}

/// A generated allocation input.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub rooms: Vec<Room>,
    pub queues: BatchQueues,
    pub mask: BlockedSeats,
}

/// Strategy for small allocation inputs.
pub fn arb_scenario() -> impl Strategy<Value = Scenario> {
    let rooms = prop::collection::vec((1u32..6, 1u32..6), 1..5);
    let sizes = prop::collection::vec(0usize..25, 1..5);
    let blocked = prop::collection::vec((0usize..5, 1u32..6, 1u32..6), 0..8);
    (rooms, sizes, blocked).prop_map(|(dims, sizes, blocked)| {
        let rooms: Vec<Room> = dims
            .iter()
            .enumerate()
            .map(|(i, &(rows, columns))| room(&format!("R{}", 101 + i), rows, columns))
            .collect();

        let mut queues = BatchQueues::new();
        for (b, count) in sizes.iter().enumerate() {
            let key = batch(&format!("{}", 50 + b));
            let students = (0..*count).map(|n| student(&format!("{key}-{n:03}")));
            queues.extend(&key, students).expect("generated students are unique");
        }

        let entries = blocked.into_iter().filter_map(|(i, r, c)| {
            let room = rooms.get(i % rooms.len())?;
            Some((room.id.clone(), [Seat::new(r, c).ok()?]))
        });
        let mask = BlockedSeats::from_entries(entries);

        Scenario {
            rooms,
            queues,
            mask,
        }
    })
}
