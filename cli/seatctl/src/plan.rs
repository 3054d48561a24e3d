//! Run plan loading.
//!
//! A plan names the rooms, the processing order, extra blocked seats, the
//! session header and either roster records or pre-built batch queues.
//! Files ending in `.json` are parsed as JSON, everything else as TOML.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use seatplan_allocator::{
    AllocationIssue, AllocationOutcome, BatchQueues, BlockedSeats, QueueError, Room, RoomTable,
    SeatAllocator,
};
use seatplan_id::{BatchKey, RoomId, Seat, StudentId};
use seatplan_reports::SessionInfo;
use seatplan_roster::{Roster, StudentRecord};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Settings;

/// Errors loading or preparing a plan.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("failed to read plan {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in plan {path}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid JSON in plan {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid batch queues")]
    Queue(#[from] QueueError),
}

/// Whether the built-in blocked-seat table applies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockedPolicy {
    /// Falls back to the `builtin_blocked` setting when absent.
    #[serde(default)]
    pub builtin: Option<bool>,
}

/// A run plan file as written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunPlan {
    pub session: SessionInfo,
    pub room_order: Vec<RoomId>,
    pub rooms: Vec<Room>,
    pub blocked: BTreeMap<RoomId, Vec<Seat>>,
    pub blocked_policy: BlockedPolicy,
    pub students: Vec<StudentRecord>,
    pub batches: BTreeMap<BatchKey, Vec<StudentId>>,
}

impl RunPlan {
    /// Read and parse a plan file.
    pub fn load(path: &Path) -> Result<Self, PlanError> {
        let contents = std::fs::read_to_string(path).map_err(|source| PlanError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&contents).map_err(|source| PlanError::Json {
                path: path.to_path_buf(),
                source,
            })
        } else {
            Self::from_toml_str(&contents).map_err(|source| PlanError::Toml {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn from_json_str(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }

    /// True when the plan carries both roster records and batch queues.
    pub fn has_both_student_sources(&self) -> bool {
        !self.students.is_empty() && !self.batches.is_empty()
    }

    /// The blocked-seat mask for this plan.
    pub fn mask(&self, settings: &Settings) -> BlockedSeats {
        let explicit = BlockedSeats::from_entries(
            self.blocked
                .iter()
                .map(|(room, seats)| (room.clone(), seats.iter().copied())),
        );
        if self.blocked_policy.builtin.unwrap_or(settings.builtin_blocked) {
            BlockedSeats::builtin().merge(&explicit)
        } else {
            explicit
        }
    }
}

/// Everything one allocation run needs, resolved from a plan and settings.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub session: SessionInfo,
    pub table: RoomTable,
    /// Rooms in processing order.
    pub rooms: Vec<Room>,
    pub mask: BlockedSeats,
    /// Empty when the plan supplied batch queues directly.
    pub roster: Roster,
    pub queues: BatchQueues,
    /// Problems found resolving the room order.
    pub issues: Vec<AllocationIssue>,
    pub day_marker: String,
}

impl RunContext {
    /// Resolve a plan into run inputs.
    pub fn from_plan(plan: &RunPlan, settings: &Settings) -> Result<Self, PlanError> {
        let table = RoomTable::new(plan.rooms.clone());
        let (rooms, issues) = table.resolve(&plan.room_order);
        let mask = plan.mask(settings);

        if plan.has_both_student_sources() {
            warn!("plan has both students and batches; using students");
        }
        let (roster, queues) = if plan.students.is_empty() {
            let mut queues = BatchQueues::new();
            for (batch, students) in &plan.batches {
                queues.extend(batch, students.iter().cloned())?;
            }
            (Roster::default(), queues)
        } else {
            let roster = Roster::from_records(plan.students.iter().cloned());
            let queues = roster.batch_queues();
            (roster, queues)
        };

        info!(
            rooms = rooms.len(),
            students = queues.total_remaining(),
            batches = queues.batch_count(),
            capacity = table.total_capacity(&mask),
            "plan loaded"
        );

        Ok(Self {
            session: plan.session.clone(),
            table,
            rooms,
            mask,
            roster,
            queues,
            issues,
            day_marker: settings.day_marker.clone(),
        })
    }

    /// Load a plan file and resolve it.
    pub fn load(path: &Path, settings: &Settings) -> Result<Self, PlanError> {
        let plan = RunPlan::load(path)?;
        Self::from_plan(&plan, settings)
    }

    /// Run the allocator on a copy of the queues.
    ///
    /// Room order problems are reported ahead of the allocator's own issues.
    pub fn allocate(&self) -> AllocationOutcome {
        let mut queues = self.queues.clone();
        let mut outcome = SeatAllocator::new().run(&self.rooms, &mut queues, &self.mask);
        let mut issues = self.issues.clone();
        issues.append(&mut outcome.issues);
        outcome.issues = issues;
        outcome
    }

    /// Look a room up by id.
    pub fn room(&self, id: &str) -> Option<&Room> {
        let id = RoomId::parse(id).ok()?;
        self.table.get(&id)
    }

    /// Usable seats across the processing order.
    pub fn capacity(&self) -> usize {
        self.rooms.iter().map(|room| room.capacity(&self.mask)).sum()
    }
}
