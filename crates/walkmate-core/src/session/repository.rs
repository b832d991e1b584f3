//! Session repository trait.
//!
//! Defines the interface against the session store. The store is the only
//! mutable shared state in the matching path, so every write goes through a
//! conditional update guarded by the version the caller read.

use super::model::{SessionStatus, WalkSession};
use crate::error::Result;
use async_trait::async_trait;

/// Outcome of a version-guarded conditional update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The update was written; the caller's copy is now current.
    Applied,
    /// Another writer committed first; nothing was written. The caller must
    /// re-read and re-validate before retrying.
    VersionConflict,
}

/// Filter for session listings.
///
/// Soft-deleted sessions are excluded unless `include_deleted` is set
/// (audit retrieval).
#[derive(Debug, Clone, Default)]
pub struct SessionFilter {
    pub status: Option<SessionStatus>,
    pub owner_id: Option<String>,
    pub walker_id: Option<String>,
    pub include_deleted: bool,
}

impl SessionFilter {
    /// Returns true when the session passes this filter.
    pub fn matches(&self, session: &WalkSession) -> bool {
        if session.deleted && !self.include_deleted {
            return false;
        }
        if let Some(status) = self.status {
            if session.status != status {
                return false;
            }
        }
        if let Some(ref owner_id) = self.owner_id {
            if &session.owner_id != owner_id {
                return false;
            }
        }
        if let Some(ref walker_id) = self.walker_id {
            if session.walker_id.as_ref() != Some(walker_id) {
                return false;
            }
        }
        true
    }
}

/// An abstract repository for the session store.
///
/// This trait decouples the matching engine from the specific storage
/// mechanism (in-memory for tests, a transactional relational store in
/// production).
///
/// # Implementation Notes
///
/// - `find_by_id` returns soft-deleted sessions too; callers that must not
///   see them filter on `deleted` themselves.
/// - `update` must be atomic: compare the stored version against
///   `expected_version` and write only on a match, as a single transaction.
/// - Store unavailability surfaces as `TransientStore`.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Finds a session by its ID, including soft-deleted ones.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(WalkSession))`: Session found
    /// - `Ok(None)`: Session unknown
    /// - `Err(_)`: Store unavailable
    async fn find_by_id(&self, session_id: &str) -> Result<Option<WalkSession>>;

    /// Inserts a newly created session.
    async fn insert(&self, session: &WalkSession) -> Result<()>;

    /// Conditionally replaces a session, guarded by the version the caller
    /// loaded.
    ///
    /// # Returns
    ///
    /// - `Ok(CommitOutcome::Applied)`: The write took effect
    /// - `Ok(CommitOutcome::VersionConflict)`: Another writer won; nothing
    ///   was written
    /// - `Err(NotFound)`: The session id is unknown
    /// - `Err(TransientStore)`: Store unavailable; the update did not take
    ///   effect and may be retried
    async fn update(&self, session: &WalkSession, expected_version: u64)
    -> Result<CommitOutcome>;

    /// Lists sessions matching the filter, oldest first.
    async fn list(&self, filter: &SessionFilter) -> Result<Vec<WalkSession>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{SessionKind, WalkSchedule};
    use chrono::Utc;

    fn session() -> WalkSession {
        WalkSession::new(
            "owner-1",
            "pet-1",
            SessionKind::Scheduled,
            WalkSchedule {
                starts_at: Utc::now(),
                duration_minutes: 30,
            },
            1000,
        )
    }

    #[test]
    fn test_filter_excludes_deleted_by_default() {
        let mut s = session();
        s.deleted = true;

        assert!(!SessionFilter::default().matches(&s));

        let audit = SessionFilter {
            include_deleted: true,
            ..Default::default()
        };
        assert!(audit.matches(&s));
    }

    #[test]
    fn test_filter_by_status_and_owner() {
        let s = session();
        let filter = SessionFilter {
            status: Some(SessionStatus::Pending),
            owner_id: Some("owner-1".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&s));

        let other_owner = SessionFilter {
            owner_id: Some("owner-2".to_string()),
            ..Default::default()
        };
        assert!(!other_owner.matches(&s));
    }

    #[test]
    fn test_filter_by_walker_requires_assignment() {
        let mut s = session();
        let filter = SessionFilter {
            walker_id: Some("walker-1".to_string()),
            ..Default::default()
        };
        assert!(!filter.matches(&s));

        s.walker_id = Some("walker-1".to_string());
        assert!(filter.matches(&s));
    }
}
