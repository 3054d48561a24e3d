//! The assignment ledger.

use std::collections::HashMap;

use seatplan_id::{RoomId, Seat, StudentId};
use tracing::debug;

use crate::{LedgerError, RunDigest, SeatAssignment};

/// Result of recording an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// A new record was appended.
    Inserted,

    /// The (student, room) pair was already recorded; the first record wins.
    Duplicate,
}

/// Append-only store of seat assignments with room and student indexes.
#[derive(Debug, Clone, Default)]
pub struct AssignmentLedger {
    records: Vec<SeatAssignment>,
    by_student: HashMap<StudentId, usize>,
    by_seat: HashMap<(RoomId, Seat), usize>,
    /// Rooms in first-seen order, each with its record indexes.
    rooms: Vec<(RoomId, Vec<usize>)>,
    room_index: HashMap<RoomId, usize>,
}

impl AssignmentLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger by replaying assignments in order.
    ///
    /// Duplicate (student, room) pairs collapse; conflicting records are
    /// returned alongside the ledger instead of aborting the replay.
    pub fn from_assignments<I>(assignments: I) -> (Self, Vec<LedgerError>)
    where
        I: IntoIterator<Item = SeatAssignment>,
    {
        let mut ledger = Self::new();
        let mut rejected = Vec::new();
        for assignment in assignments {
            if let Err(e) = ledger.record(assignment) {
                rejected.push(e);
            }
        }
        (ledger, rejected)
    }

    /// Record an assignment.
    pub fn record(&mut self, assignment: SeatAssignment) -> Result<RecordOutcome, LedgerError> {
        if let Some(&idx) = self.by_student.get(&assignment.student_id) {
            let existing = &self.records[idx];
            if existing.room_id == assignment.room_id {
                debug!(
                    student_id = %assignment.student_id,
                    room_id = %assignment.room_id,
                    "Duplicate assignment collapsed"
                );
                return Ok(RecordOutcome::Duplicate);
            }
            return Err(LedgerError::StudentAlreadySeated {
                student: assignment.student_id,
                room: assignment.room_id,
                existing_room: existing.room_id.clone(),
            });
        }

        let seat_key = (assignment.room_id.clone(), assignment.seat);
        if let Some(&idx) = self.by_seat.get(&seat_key) {
            return Err(LedgerError::SeatTaken {
                room: assignment.room_id,
                seat: assignment.seat,
                occupant: self.records[idx].student_id.clone(),
            });
        }

        let idx = self.records.len();
        self.by_student.insert(assignment.student_id.clone(), idx);
        self.by_seat.insert(seat_key, idx);
        let room_slot = match self.room_index.get(&assignment.room_id) {
            Some(&slot) => slot,
            None => {
                let slot = self.rooms.len();
                self.rooms.push((assignment.room_id.clone(), Vec::new()));
                self.room_index.insert(assignment.room_id.clone(), slot);
                slot
            }
        };
        self.rooms[room_slot].1.push(idx);
        self.records.push(assignment);
        Ok(RecordOutcome::Inserted)
    }

    /// Assignments in a room, in insertion order.
    pub fn by_room<'a>(&'a self, room: &RoomId) -> impl Iterator<Item = &'a SeatAssignment> + 'a {
        let indexes: &[usize] = self
            .room_index
            .get(room)
            .map(|&slot| self.rooms[slot].1.as_slice())
            .unwrap_or(&[]);
        indexes.iter().map(move |&i| &self.records[i])
    }

    /// The assignment for a student, if seated.
    pub fn by_student(&self, student: &StudentId) -> Option<&SeatAssignment> {
        self.by_student.get(student).map(|&i| &self.records[i])
    }

    /// The assignment occupying a seat, if any.
    pub fn at(&self, room: &RoomId, seat: Seat) -> Option<&SeatAssignment> {
        self.by_seat
            .get(&(room.clone(), seat))
            .map(|&i| &self.records[i])
    }

    /// Rooms with at least one assignment, in first-seen order.
    pub fn rooms(&self) -> impl Iterator<Item = &RoomId> {
        self.rooms.iter().map(|(room, _)| room)
    }

    /// Number of assignments in a room.
    pub fn room_len(&self, room: &RoomId) -> usize {
        self.room_index
            .get(room)
            .map(|&slot| self.rooms[slot].1.len())
            .unwrap_or(0)
    }

    /// All assignments in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &SeatAssignment> {
        self.records.iter()
    }

    /// All assignments as a slice, in insertion order.
    pub fn as_slice(&self) -> &[SeatAssignment] {
        &self.records
    }

    /// Number of assignments.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Digest of the assignment sequence.
    pub fn digest(&self) -> RunDigest {
        RunDigest::of(&self.records)
    }

    /// Consume the ledger, returning the assignments in insertion order.
    pub fn into_vec(self) -> Vec<SeatAssignment> {
        self.records
    }
}

impl<'a> IntoIterator for &'a AssignmentLedger {
    type Item = &'a SeatAssignment;
    type IntoIter = std::slice::Iter<'a, SeatAssignment>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
