//! The seat assignment record.

use seatplan_id::{BatchKey, IdError, RoomId, Seat, StudentId};
use serde::{Deserialize, Serialize};

/// One student bound to one seat.
///
/// Serializes flat as `{room_id, row, column, student_id, batch_key}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "AssignmentWire", try_from = "AssignmentWire")]
pub struct SeatAssignment {
    /// Room the seat belongs to.
    pub room_id: RoomId,

    /// The seat coordinate.
    pub seat: Seat,

    /// The seated student.
    pub student_id: StudentId,

    /// Batch the student was drawn from.
    pub batch_key: BatchKey,
}

impl SeatAssignment {
    /// Creates an assignment for a seat.
    pub fn new(room_id: RoomId, seat: Seat, student_id: StudentId, batch_key: BatchKey) -> Self {
        Self {
            room_id,
            seat,
            student_id,
            batch_key,
        }
    }

    /// 1-based row.
    pub fn row(&self) -> u32 {
        self.seat.row()
    }

    /// 1-based column.
    pub fn column(&self) -> u32 {
        self.seat.column()
    }
}

#[derive(Serialize, Deserialize)]
struct AssignmentWire {
    room_id: RoomId,
    row: u32,
    column: u32,
    student_id: StudentId,
    batch_key: BatchKey,
}

impl From<SeatAssignment> for AssignmentWire {
    fn from(a: SeatAssignment) -> Self {
        Self {
            room_id: a.room_id,
            row: a.seat.row(),
            column: a.seat.column(),
            student_id: a.student_id,
            batch_key: a.batch_key,
        }
    }
}

impl TryFrom<AssignmentWire> for SeatAssignment {
    type Error = IdError;

    fn try_from(w: AssignmentWire) -> Result<Self, Self::Error> {
        Ok(Self {
            room_id: w.room_id,
            seat: Seat::new(w.row, w.column)?,
            student_id: w.student_id,
            batch_key: w.batch_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_serializes_flat() {
        let a = SeatAssignment::new(
            RoomId::parse("101").unwrap(),
            Seat::new(1, 2).unwrap(),
            StudentId::parse("s1").unwrap(),
            BatchKey::canonical("A").unwrap(),
        );
        let value = serde_json::to_value(&a).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "room_id": "101",
                "row": 1,
                "column": 2,
                "student_id": "s1",
                "batch_key": "A"
            })
        );
        let back: SeatAssignment = serde_json::from_value(value).unwrap();
        assert_eq!(back, a);
    }

    #[test]
    fn test_assignment_rejects_zero_row() {
        let value = serde_json::json!({
            "room_id": "101",
            "row": 0,
            "column": 2,
            "student_id": "s1",
            "batch_key": "A"
        });
        assert!(serde_json::from_value::<SeatAssignment>(value).is_err());
    }
}
