//! Error and diagnostic types for allocation.

use seatplan_id::{BatchKey, RoomId, StudentId};
use seatplan_ledger::LedgerError;
use thiserror::Error;

/// Non-fatal problems found while allocating.
///
/// None of these abort a run; each is logged and recorded in the
/// [`AllocationOutcome`](crate::AllocationOutcome) diagnostics.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AllocationIssue {
    /// A room listed for allocation has no capacity entry.
    #[error("room {room} has no capacity entry; skipped")]
    UnknownRoom { room: RoomId },

    /// A room has zero rows or zero columns.
    #[error("room {room} has an empty grid ({rows}x{columns}); skipped")]
    EmptyGrid {
        room: RoomId,
        rows: u32,
        columns: u32,
    },

    /// A room appears more than once in the processing order.
    #[error("room {room} is listed more than once; later entry skipped")]
    DuplicateRoom { room: RoomId },

    /// Nothing to allocate.
    #[error("nothing to allocate: {0}")]
    EmptyInput(EmptyInput),

    /// The ledger rejected an assignment.
    #[error("assignment rejected: {0}")]
    Rejected(#[from] LedgerError),
}

impl AllocationIssue {
    /// Returns true for room configuration problems.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            AllocationIssue::UnknownRoom { .. }
                | AllocationIssue::EmptyGrid { .. }
                | AllocationIssue::DuplicateRoom { .. }
        )
    }

    /// Returns true when the run had no rooms or no students.
    pub fn is_empty_input(&self) -> bool {
        matches!(self, AllocationIssue::EmptyInput(_))
    }
}

/// Which input was empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyInput {
    /// No rooms to seat students in.
    NoRooms,

    /// No students waiting in any batch.
    NoStudents,
}

impl std::fmt::Display for EmptyInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmptyInput::NoRooms => write!(f, "no rooms"),
            EmptyInput::NoStudents => write!(f, "no students"),
        }
    }
}

/// Errors building batch queues.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// A student was queued twice.
    #[error("student {student} is already queued in batch {existing}, cannot queue in {batch}")]
    DuplicateStudent {
        student: StudentId,
        batch: BatchKey,
        existing: BatchKey,
    },
}
