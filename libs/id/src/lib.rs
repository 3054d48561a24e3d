//! # seatplan-id
//!
//! Typed labels for the seat planner.
//!
//! ## Design Principles
//!
//! - Labels come from upstream documents and are user-controlled strings
//! - Every label is trimmed and validated once, at ingestion
//! - Labels are typed so a room id can never be passed where a student id
//!   is expected
//! - Batch keys have exactly one canonical string form
//!
//! ## Batch Keys
//!
//! Batch numbers arrive both as integers (`56`) and as spreadsheet floats
//! (`56.0`). [`BatchKey::canonical`] folds both into `"56"` so equality and
//! ordering never depend on how a cell was typed.

mod error;
mod macros;
mod types;

pub use error::IdError;
pub use types::*;
