//! Error types for roster normalization.

use seatplan_id::{IdError, StudentId};
use thiserror::Error;

/// Why a student record was dropped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RosterError {
    /// The record has no usable student id.
    #[error("record {index}: invalid student id: {source}")]
    InvalidId {
        index: usize,
        #[source]
        source: IdError,
    },

    /// The record has no usable batch label.
    #[error("record {index} ({student}): invalid batch: {source}")]
    InvalidBatch {
        index: usize,
        student: StudentId,
        #[source]
        source: IdError,
    },

    /// The student id was already seen in an earlier record.
    #[error("record {index}: duplicate student id {student}")]
    Duplicate { index: usize, student: StudentId },
}

impl RosterError {
    /// Position of the offending record in the input.
    pub fn index(&self) -> usize {
        match self {
            RosterError::InvalidId { index, .. }
            | RosterError::InvalidBatch { index, .. }
            | RosterError::Duplicate { index, .. } => *index,
        }
    }
}
