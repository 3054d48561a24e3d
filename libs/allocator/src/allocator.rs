//! The two-phase seat allocator.

use std::collections::{BTreeMap, HashMap, HashSet};

use seatplan_id::{BatchKey, RoomId, Seat, StudentId};
use seatplan_ledger::{AssignmentLedger, SeatAssignment};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use crate::layout::{column_partitions, open_seats};
use crate::{AllocationIssue, BatchQueues, BlockedSeats, EmptyInput, Room};

/// Allocation strategy in effect for a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Exactly two batches per room, split by column parity.
    TwoBatch,

    /// Column-major fill that avoids repeating a batch within a row.
    Leftover,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::TwoBatch => write!(f, "two_batch"),
            Phase::Leftover => write!(f, "leftover"),
        }
    }
}

/// What happened in one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomReport {
    /// The room.
    pub room_id: RoomId,

    /// Strategy used to fill it.
    pub phase: Phase,

    /// Usable seats in the room.
    pub capacity: usize,

    /// Students seated in the room.
    pub seated: usize,

    /// Batches seated in the room, in order of first placement.
    pub batches: Vec<BatchKey>,
}

/// Result of an allocation run.
#[derive(Debug, Clone)]
pub struct AllocationOutcome {
    /// Every assignment, in the order it was made.
    pub ledger: AssignmentLedger,

    /// One report per room that was filled, in processing order.
    pub rooms: Vec<RoomReport>,

    /// Non-fatal problems encountered along the way.
    pub issues: Vec<AllocationIssue>,

    /// Students left unseated, by batch.
    pub residual: BTreeMap<BatchKey, Vec<StudentId>>,

    /// Phase in effect when the run ended.
    pub final_phase: Phase,
}

impl AllocationOutcome {
    /// Number of students that could not be seated.
    pub fn shortfall(&self) -> usize {
        self.residual.values().map(Vec::len).sum()
    }

    /// Returns true if every student was seated.
    pub fn is_complete(&self) -> bool {
        self.shortfall() == 0
    }

    /// Assignments in the order they were made.
    pub fn assignments(&self) -> &[SeatAssignment] {
        self.ledger.as_slice()
    }

    /// Rooms skipped for configuration problems.
    pub fn rooms_skipped(&self) -> usize {
        count_skipped(&self.issues)
    }

    /// First room filled in leftover mode, if pairing ever failed.
    pub fn phase_switched_at(&self) -> Option<&RoomId> {
        self.rooms
            .iter()
            .find(|r| r.phase == Phase::Leftover)
            .map(|r| &r.room_id)
    }
}

/// Seats students room by room.
///
/// An allocator owns the run's phase flag, so each run needs its own
/// instance. The flag starts at [`Phase::TwoBatch`] and flips to
/// [`Phase::Leftover`] the first time a room cannot be paired.
#[derive(Debug)]
pub struct SeatAllocator {
    phase: Phase,
}

impl Default for SeatAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Two batches matched to a room's column halves.
struct Pairing {
    primary: BatchKey,
    primary_seats: Vec<Seat>,
    secondary: BatchKey,
    secondary_seats: Vec<Seat>,
}

impl SeatAllocator {
    /// Create an allocator for a new run.
    pub fn new() -> Self {
        Self {
            phase: Phase::TwoBatch,
        }
    }

    /// Phase that the next room will start in.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Seat students from `queues` into `rooms`, in order.
    ///
    /// Students are removed from the front of their queues as they are
    /// seated. Whatever is left afterwards is the shortfall.
    #[instrument(skip_all, fields(rooms = rooms.len(), students = queues.total_remaining()))]
    pub fn run(
        &mut self,
        rooms: &[Room],
        queues: &mut BatchQueues,
        mask: &BlockedSeats,
    ) -> AllocationOutcome {
        let mut ledger = AssignmentLedger::new();
        let mut reports = Vec::new();
        let mut issues = Vec::new();

        if rooms.is_empty() {
            warn!("No rooms to allocate");
            issues.push(AllocationIssue::EmptyInput(EmptyInput::NoRooms));
        } else if queues.is_exhausted() {
            warn!("No students to allocate");
            issues.push(AllocationIssue::EmptyInput(EmptyInput::NoStudents));
        } else {
            let mut seen: HashSet<&RoomId> = HashSet::new();
            for room in rooms {
                if !seen.insert(&room.id) {
                    warn!(room_id = %room.id, "Room listed twice; skipping");
                    issues.push(AllocationIssue::DuplicateRoom {
                        room: room.id.clone(),
                    });
                    continue;
                }
                if !room.has_seats() {
                    warn!(
                        room_id = %room.id,
                        rows = room.rows,
                        columns = room.columns,
                        "Room has no seats; skipping"
                    );
                    issues.push(AllocationIssue::EmptyGrid {
                        room: room.id.clone(),
                        rows: room.rows,
                        columns: room.columns,
                    });
                    continue;
                }

                let report = self.fill_room(room, queues, mask, &mut ledger, &mut issues);
                info!(
                    room_id = %report.room_id,
                    phase = %report.phase,
                    seated = report.seated,
                    capacity = report.capacity,
                    "Room filled"
                );
                reports.push(report);

                if queues.is_exhausted() {
                    info!("All students have been seated");
                    break;
                }
            }
        }

        let residual = queues.residual();
        let remaining: usize = residual.values().map(Vec::len).sum();
        if remaining > 0 && !rooms.is_empty() {
            warn!(remaining, "Not enough seats for every student");
        }
        info!(
            rooms_processed = reports.len(),
            rooms_skipped = count_skipped(&issues),
            seated = ledger.len(),
            remaining,
            "Allocation run complete"
        );

        AllocationOutcome {
            ledger,
            rooms: reports,
            issues,
            residual,
            final_phase: self.phase,
        }
    }

    /// Fill a single room using the current phase.
    ///
    /// If the allocator is still pairing and the room cannot be paired, the
    /// phase flips permanently and this room is filled in leftover mode.
    pub fn fill_room(
        &mut self,
        room: &Room,
        queues: &mut BatchQueues,
        mask: &BlockedSeats,
        ledger: &mut AssignmentLedger,
        issues: &mut Vec<AllocationIssue>,
    ) -> RoomReport {
        let mut placed = Vec::new();

        if self.phase == Phase::TwoBatch {
            match plan_pairing(room, queues, mask) {
                Some(pairing) => {
                    seat_pairing(room, pairing, queues, ledger, issues, &mut placed);
                }
                None => {
                    warn!(
                        room_id = %room.id,
                        "Cannot fill room with exactly two batches; switching to leftover mode"
                    );
                    self.phase = Phase::Leftover;
                    fill_leftover(room, queues, mask, ledger, issues, &mut placed);
                }
            }
        } else {
            fill_leftover(room, queues, mask, ledger, issues, &mut placed);
        }

        let mut batches: Vec<BatchKey> = Vec::new();
        for batch in &placed {
            if !batches.contains(batch) {
                batches.push(batch.clone());
            }
        }

        RoomReport {
            room_id: room.id.clone(),
            phase: self.phase,
            capacity: room.capacity(mask),
            seated: placed.len(),
            batches,
        }
    }
}

/// Seat students from `batches` into `rooms` and return the assignments.
///
/// Convenience wrapper over [`SeatAllocator::run`] for callers that only
/// need the assignment sequence. Residual students stay in `batches`.
pub fn allocate(
    rooms: &[Room],
    batches: &mut BatchQueues,
    blocked: &BlockedSeats,
) -> Vec<SeatAssignment> {
    SeatAllocator::new()
        .run(rooms, batches, blocked)
        .ledger
        .into_vec()
}

fn plan_pairing(room: &Room, queues: &BatchQueues, mask: &BlockedSeats) -> Option<Pairing> {
    let parts = column_partitions(room.columns);
    let primary_seats = open_seats(&room.id, room.rows, &parts.primary, mask);
    let secondary_seats = open_seats(&room.id, room.rows, &parts.secondary, mask);
    debug!(
        room_id = %room.id,
        primary_capacity = primary_seats.len(),
        secondary_capacity = secondary_seats.len(),
        "Column partitions computed"
    );

    // A paired room holds exactly two batches, so both halves need seats.
    if primary_seats.is_empty() || secondary_seats.is_empty() {
        return None;
    }

    let ranked = queues.ranked();
    let primary = ranked
        .iter()
        .find(|b| queues.remaining(b) >= primary_seats.len())?
        .clone();
    let secondary = ranked
        .iter()
        .find(|b| **b != primary && queues.remaining(b) >= secondary_seats.len())?
        .clone();

    Some(Pairing {
        primary,
        primary_seats,
        secondary,
        secondary_seats,
    })
}

fn seat_pairing(
    room: &Room,
    pairing: Pairing,
    queues: &mut BatchQueues,
    ledger: &mut AssignmentLedger,
    issues: &mut Vec<AllocationIssue>,
    placed: &mut Vec<BatchKey>,
) {
    let halves = [
        (pairing.primary, pairing.primary_seats),
        (pairing.secondary, pairing.secondary_seats),
    ];
    for (batch, seats) in halves {
        let students = queues.take_front(&batch, seats.len());
        for (seat, student) in seats.into_iter().zip(students) {
            let assignment = SeatAssignment::new(room.id.clone(), seat, student, batch.clone());
            if record(ledger, issues, assignment) {
                placed.push(batch.clone());
            }
        }
    }
}

fn fill_leftover(
    room: &Room,
    queues: &mut BatchQueues,
    mask: &BlockedSeats,
    ledger: &mut AssignmentLedger,
    issues: &mut Vec<AllocationIssue>,
    placed: &mut Vec<BatchKey>,
) {
    // Ranked once per room; batches drop out as they empty.
    let mut candidates = queues.ranked();
    let mut last_in_row: HashMap<u32, BatchKey> = HashMap::new();

    'columns: for column in (1..=room.columns).rev() {
        for row in 1..=room.rows {
            let Ok(seat) = Seat::new(row, column) else {
                continue;
            };
            if mask.is_seat_blocked(&room.id, seat) {
                continue;
            }
            let Some((batch, student)) =
                next_student(&mut candidates, queues, last_in_row.get(&row))
            else {
                break 'columns;
            };
            let assignment = SeatAssignment::new(room.id.clone(), seat, student, batch.clone());
            if record(ledger, issues, assignment) {
                placed.push(batch.clone());
            }
            last_in_row.insert(row, batch);
        }
    }
}

/// Pop the next student, preferring a batch other than `forbidden`.
///
/// Falls back to the largest remaining batch when every candidate matches
/// `forbidden`.
fn next_student(
    candidates: &mut Vec<BatchKey>,
    queues: &mut BatchQueues,
    forbidden: Option<&BatchKey>,
) -> Option<(BatchKey, StudentId)> {
    loop {
        if candidates.is_empty() {
            return None;
        }
        let pick = candidates
            .iter()
            .position(|b| Some(b) != forbidden)
            .unwrap_or(0);
        match queues.pop_front(&candidates[pick]) {
            Some(student) => {
                let batch = if queues.remaining(&candidates[pick]) == 0 {
                    candidates.remove(pick)
                } else {
                    candidates[pick].clone()
                };
                return Some((batch, student));
            }
            None => {
                candidates.remove(pick);
            }
        }
    }
}

fn count_skipped(issues: &[AllocationIssue]) -> usize {
    issues
        .iter()
        .filter(|issue| issue.is_configuration_error())
        .count()
}

fn record(
    ledger: &mut AssignmentLedger,
    issues: &mut Vec<AllocationIssue>,
    assignment: SeatAssignment,
) -> bool {
    match ledger.record(assignment) {
        Ok(_) => true,
        Err(e) => {
            error!(error = %e, "Assignment rejected by ledger");
            issues.push(AllocationIssue::Rejected(e));
            false
        }
    }
}
