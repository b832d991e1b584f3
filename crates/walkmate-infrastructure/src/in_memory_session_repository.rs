//! In-memory SessionRepository implementation.
//!
//! The development and test stand-in for the transactional relational
//! session store. The conditional-update contract is the same one a SQL
//! implementation would provide with a version-guarded `UPDATE ... WHERE
//! version = ?`: compare under the write lock, write only on a match.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use walkmate_core::WalkmateError;
use walkmate_core::error::Result;
use walkmate_core::session::{CommitOutcome, SessionFilter, SessionRepository, WalkSession};

/// Session store backed by a process-local map.
#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<String, WalkSession>>,
}

impl InMemorySessionRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn find_by_id(&self, session_id: &str) -> Result<Option<WalkSession>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(session_id).cloned())
    }

    async fn insert(&self, session: &WalkSession) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn update(
        &self,
        session: &WalkSession,
        expected_version: u64,
    ) -> Result<CommitOutcome> {
        let mut sessions = self.sessions.write().await;
        let current = sessions
            .get(&session.id)
            .ok_or_else(|| WalkmateError::not_found("session", session.id.clone()))?;
        if current.version != expected_version {
            tracing::debug!(
                target: "store",
                "conditional update on '{}' lost: expected version {}, found {}",
                session.id, expected_version, current.version
            );
            return Ok(CommitOutcome::VersionConflict);
        }
        sessions.insert(session.id.clone(), session.clone());
        Ok(CommitOutcome::Applied)
    }

    async fn list(&self, filter: &SessionFilter) -> Result<Vec<WalkSession>> {
        let sessions = self.sessions.read().await;
        let mut matching: Vec<WalkSession> = sessions
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(matching)
    }
}
