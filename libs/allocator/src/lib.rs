//! Exam seat allocation engine.
//!
//! Seats students from per-batch queues into an ordered list of rooms.
//! Key concepts:
//!
//! - **Phase A (two-batch pairing)**: a room's columns are split by parity
//!   and each half is filled from a single batch, so neighbours across a
//!   column always belong to different batches.
//! - **Phase B (leftover fill)**: once pairing fails for any room, every
//!   remaining seat is filled column by column, preferring a batch that
//!   differs from the previous seat in the same row.
//! - **Blocked seats**: coordinates that never receive a student.
//!
//! # Invariants
//!
//! - A student is seated at most once; a seat holds at most one student
//! - Blocked seats are never assigned
//! - The phase only moves from A to B, never back, within one run
//! - Decisions are deterministic given the same inputs
//! - Problems with a single room are reported and skipped, never fatal

mod allocator;
mod error;
mod layout;
mod mask;
mod queues;
mod room;

pub use allocator::{allocate, AllocationOutcome, Phase, RoomReport, SeatAllocator};
pub use error::{AllocationIssue, EmptyInput, QueueError};
pub use layout::{column_partitions, ColumnPartitions};
pub use mask::BlockedSeats;
pub use queues::BatchQueues;
pub use room::{Room, RoomTable};
