//! # seatplan-reports
//!
//! Data views derived from a finished allocation: per-room seat charts, the
//! room by batch summary, attendance groups and the envelope list.
//!
//! Every view is read-only over the [`AssignmentLedger`], the [`Roster`],
//! the room table and the blocked-seat mask. Nothing here renders to a
//! document format; callers print the values as tables or JSON.
//!
//! [`AssignmentLedger`]: seatplan_ledger::AssignmentLedger
//! [`Roster`]: seatplan_roster::Roster

mod attendance;
mod chart;
mod envelope;
mod session;
mod summary;

pub use attendance::{attendance_groups, AttendanceEntry, AttendanceGroup, AttendanceRoom};
pub use chart::{BatchLine, SeatCell, SeatChart};
pub use envelope::{envelope_list, Envelope};
pub use session::SessionInfo;
pub use summary::{Summary, SummaryCell, SummaryRow, DEFAULT_DAY_MARKER};
