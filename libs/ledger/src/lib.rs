//! # seatplan-ledger
//!
//! The append-only record of who sits where.
//!
//! ## Design Principles
//!
//! - Assignments are immutable once recorded
//! - A student is seated at most once; a seat holds at most one student
//! - Replaying the same assignments is safe: a repeated (student, room)
//!   pair collapses to the first record
//! - Iteration order is insertion order, so consumers see rooms and seats
//!   in the order the allocator produced them

mod assignment;
mod digest;
mod error;
mod ledger;

pub use assignment::SeatAssignment;
pub use digest::RunDigest;
pub use error::LedgerError;
pub use ledger::{AssignmentLedger, RecordOutcome};
