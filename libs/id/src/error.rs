//! Error types for label parsing and validation.

use thiserror::Error;

/// Errors that can occur when parsing or validating labels.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The label is empty after trimming.
    #[error("{kind} cannot be empty")]
    Empty { kind: &'static str },

    /// The label contains a control character.
    #[error("{kind} contains a control character: {value:?}")]
    ControlCharacter { kind: &'static str, value: String },

    /// A seat coordinate is outside the 1-based grid.
    #[error("invalid seat ({row}, {column}): rows and columns start at 1")]
    InvalidSeat { row: u32, column: u32 },
}

impl IdError {
    /// Returns true if this error indicates the input was empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, IdError::Empty { .. })
    }
}
