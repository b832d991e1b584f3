//! Session domain model.
//!
//! This module contains the core `WalkSession` entity that represents one
//! walk engagement between an owner and a walker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the current status of a walk session.
///
/// Sessions progress `Pending -> Accepted -> InProgress -> Completed`, with
/// `Pending -> Cancelled` and `Accepted -> Cancelled` as escape transitions.
/// `Completed` and `Cancelled` are terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SessionStatus {
    /// Created by the owner, open for applications.
    Pending,
    /// A walker has been assigned but the walk has not started.
    Accepted,
    /// The walk is underway; live tracking is active.
    InProgress,
    /// The walk finished normally.
    Completed,
    /// The session was called off by the owner.
    Cancelled,
}

impl SessionStatus {
    /// Returns true for states that admit no further transition.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns true while the two participants may exchange live positions.
    pub fn is_trackable(&self) -> bool {
        matches!(self, Self::Accepted | Self::InProgress)
    }
}

/// How applicants are matched to a session.
///
/// The fork is evaluated once at creation; the matching engine branches on
/// it in exactly one place (`apply`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SessionKind {
    /// First applicant is auto-accepted.
    Broadcast,
    /// The owner reviews applicants and accepts one manually.
    Scheduled,
}

/// When the walk happens and for how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkSchedule {
    /// Scheduled start of the walk
    pub starts_at: DateTime<Utc>,
    /// Planned duration in minutes
    pub duration_minutes: u32,
}

/// Represents one walk engagement between an owner and a walker.
///
/// This is the "pure" domain model the matching engine operates on,
/// independent of any specific storage format. Sessions are never physically
/// removed; they are soft-deleted or advanced to a terminal status.
///
/// # Invariants
///
/// - `walker_id` is non-null iff `status` is `Accepted`, `InProgress` or
///   `Completed`.
/// - `applicants` is empty whenever `walker_id` is non-null.
/// - A walker identity appears in `applicants` at most once; order is
///   application order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkSession {
    /// Unique session identifier (UUID format)
    pub id: String,
    /// Identity of the owner who created the session
    pub owner_id: String,
    /// The pet being walked
    pub pet_id: String,
    /// Assigned walker, unset until acceptance
    pub walker_id: Option<String>,
    /// Matching behavior, fixed at creation
    pub kind: SessionKind,
    /// Current lifecycle status
    pub status: SessionStatus,
    /// Walkers who requested this session, in application order
    #[serde(default)]
    pub applicants: Vec<String>,
    /// When the walk is scheduled and for how long
    pub schedule: WalkSchedule,
    /// Compensation offered for the walk, in the smallest currency unit
    pub compensation: i64,
    /// Stamped when the session reaches `Completed`
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
    /// Soft-delete flag; deleted sessions are excluded from listings but
    /// remain retrievable for audit
    #[serde(default)]
    pub deleted: bool,
    /// Timestamp when the session was created
    pub created_at: DateTime<Utc>,
    /// Timestamp when the session was last updated
    pub updated_at: DateTime<Utc>,
    /// Optimistic-concurrency token, bumped on every committed mutation
    #[serde(default)]
    pub version: u64,
}

impl WalkSession {
    /// Creates a new session in `Pending` with a fresh UUID.
    pub fn new(
        owner_id: impl Into<String>,
        pet_id: impl Into<String>,
        kind: SessionKind,
        schedule: WalkSchedule,
        compensation: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.into(),
            pet_id: pet_id.into(),
            walker_id: None,
            kind,
            status: SessionStatus::Pending,
            applicants: Vec::new(),
            schedule,
            compensation,
            ended_at: None,
            deleted: false,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    /// Returns true when the identity is the owner or the assigned walker.
    pub fn is_participant(&self, identity: &str) -> bool {
        self.owner_id == identity || self.walker_id.as_deref() == Some(identity)
    }

    /// Returns the other participant's identity, when one exists.
    pub fn counterpart_of(&self, identity: &str) -> Option<&str> {
        if self.owner_id == identity {
            self.walker_id.as_deref()
        } else if self.walker_id.as_deref() == Some(identity) {
            Some(self.owner_id.as_str())
        } else {
            None
        }
    }

    /// Returns true when the walker has already applied.
    pub fn has_applicant(&self, walker_id: &str) -> bool {
        self.applicants.iter().any(|a| a == walker_id)
    }
}
