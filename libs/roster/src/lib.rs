//! # seatplan-roster
//!
//! Turns raw student records into the ordered batch queues the allocator
//! consumes.
//!
//! ## Normalization
//!
//! - Every field is trimmed; batch labels are folded to [`BatchKey`] form
//! - Records without an id or a batch are dropped and reported
//! - The first record for a student id wins; later ones are reported as
//!   duplicates
//! - Students are ordered by batch ascending, then M-batch descending, then
//!   the registration sub-identifier descending; remaining ties keep input
//!   order
//!
//! [`BatchKey`]: seatplan_id::BatchKey

mod de;
mod error;
mod record;
mod roster;

pub use error::RosterError;
pub use record::{Student, StudentRecord};
pub use roster::{NormalizationReport, Roster};
