//! Error types for ledger writes.

use seatplan_id::{RoomId, Seat, StudentId};
use thiserror::Error;

/// Errors that can occur when recording an assignment.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The student already holds a seat in a different room.
    #[error("student {student} is already seated in room {existing_room}, cannot seat in {room}")]
    StudentAlreadySeated {
        student: StudentId,
        room: RoomId,
        existing_room: RoomId,
    },

    /// The seat is already occupied by another student.
    #[error("seat {seat} in room {room} is already taken by {occupant}")]
    SeatTaken {
        room: RoomId,
        seat: Seat,
        occupant: StudentId,
    },
}
