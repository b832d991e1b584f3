//! Tracking session controller.
//!
//! Gates access to the presence/location bus by session state: only the two
//! assigned participants may join a session's channel, and only while the
//! session is `Accepted` or `InProgress`.

use super::sample::ParticipantRole;
use crate::error::{Result, WalkmateError};
use crate::session::SessionRepository;
use std::sync::Arc;

/// Derives a session's channel topic from its id alone, so both legitimate
/// participants converge on the same channel without a discovery round-trip.
pub fn position_topic(session_id: &str) -> String {
    format!("walk.{}.position", session_id)
}

/// Authorization to join one session's channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelGrant {
    /// Topic to publish and subscribe on
    pub topic: String,
    /// The other participant's identity
    pub counterpart_id: String,
    /// The caller's side of the session
    pub role: ParticipantRole,
}

/// Bridges matching state to bus access.
///
/// The controller holds no authorization cache: every call re-reads current
/// session state, so a session that completed or was cancelled while a
/// client was briefly disconnected refuses re-entry.
pub struct TrackingController {
    sessions: Arc<dyn SessionRepository>,
}

impl TrackingController {
    /// Creates a new `TrackingController` over the session store.
    pub fn new(sessions: Arc<dyn SessionRepository>) -> Self {
        Self { sessions }
    }

    /// Authorizes an identity onto a session's channel.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session is unknown or soft-deleted
    /// - `Authorization` if the identity is neither the owner nor the
    ///   assigned walker
    /// - `InvalidState` if the session is not `Accepted` or `InProgress`
    pub async fn authorize(&self, session_id: &str, identity: &str) -> Result<ChannelGrant> {
        let session = match self.sessions.find_by_id(session_id).await? {
            Some(session) if !session.deleted => session,
            _ => return Err(WalkmateError::not_found("session", session_id)),
        };

        if !session.is_participant(identity) {
            return Err(WalkmateError::authorization(
                "identity is not a participant of this session",
            ));
        }
        if !session.status.is_trackable() {
            return Err(WalkmateError::invalid_state("track", session.status));
        }

        let role = if session.owner_id == identity {
            ParticipantRole::Owner
        } else {
            ParticipantRole::Walker
        };
        // A trackable session always has a walker assigned, so the
        // counterpart is defined for both sides.
        let counterpart_id = session
            .counterpart_of(identity)
            .ok_or_else(|| WalkmateError::invalid_state("track", session.status))?
            .to_string();

        tracing::debug!(
            target: "tracking",
            "granted {} '{}' access to session '{}'",
            role, identity, session_id
        );
        Ok(ChannelGrant {
            topic: position_topic(session_id),
            counterpart_id,
            role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{
        CommitOutcome, SessionFilter, SessionKind, SessionStatus, WalkSchedule, WalkSession,
    };
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MockSessionRepository {
        sessions: Mutex<HashMap<String, WalkSession>>,
    }

    impl MockSessionRepository {
        fn with_session(session: WalkSession) -> Arc<Self> {
            let mut sessions = HashMap::new();
            sessions.insert(session.id.clone(), session);
            Arc::new(Self {
                sessions: Mutex::new(sessions),
            })
        }

        fn put(&self, session: WalkSession) {
            self.sessions
                .lock()
                .unwrap()
                .insert(session.id.clone(), session);
        }
    }

    #[async_trait]
    impl SessionRepository for MockSessionRepository {
        async fn find_by_id(
            &self,
            session_id: &str,
        ) -> crate::error::Result<Option<WalkSession>> {
            Ok(self.sessions.lock().unwrap().get(session_id).cloned())
        }

        async fn insert(&self, session: &WalkSession) -> crate::error::Result<()> {
            self.put(session.clone());
            Ok(())
        }

        async fn update(
            &self,
            session: &WalkSession,
            _expected_version: u64,
        ) -> crate::error::Result<CommitOutcome> {
            self.put(session.clone());
            Ok(CommitOutcome::Applied)
        }

        async fn list(&self, filter: &SessionFilter) -> crate::error::Result<Vec<WalkSession>> {
            Ok(self
                .sessions
                .lock()
                .unwrap()
                .values()
                .filter(|s| filter.matches(s))
                .cloned()
                .collect())
        }
    }

    fn accepted_session() -> WalkSession {
        let mut session = WalkSession::new(
            "owner-1",
            "pet-1",
            SessionKind::Scheduled,
            WalkSchedule {
                starts_at: Utc::now(),
                duration_minutes: 30,
            },
            1500,
        );
        session.walker_id = Some("walker-1".to_string());
        session.status = SessionStatus::Accepted;
        session
    }

    #[tokio::test]
    async fn test_both_participants_converge_on_one_topic() {
        let session = accepted_session();
        let repo = MockSessionRepository::with_session(session.clone());
        let controller = TrackingController::new(repo);

        let owner_grant = controller.authorize(&session.id, "owner-1").await.unwrap();
        let walker_grant = controller.authorize(&session.id, "walker-1").await.unwrap();

        assert_eq!(owner_grant.topic, walker_grant.topic);
        assert_eq!(owner_grant.role, ParticipantRole::Owner);
        assert_eq!(owner_grant.counterpart_id, "walker-1");
        assert_eq!(walker_grant.role, ParticipantRole::Walker);
        assert_eq!(walker_grant.counterpart_id, "owner-1");
    }

    #[tokio::test]
    async fn test_strangers_are_refused() {
        let session = accepted_session();
        let repo = MockSessionRepository::with_session(session.clone());
        let controller = TrackingController::new(repo);

        let err = controller
            .authorize(&session.id, "stranger")
            .await
            .unwrap_err();
        assert!(err.is_authorization());
    }

    #[tokio::test]
    async fn test_authorization_tracks_current_state() {
        // Scenario E: valid while accepted/in_progress, refused once
        // completed - even for the assigned walker.
        let session = accepted_session();
        let repo = MockSessionRepository::with_session(session.clone());
        let controller = TrackingController::new(repo.clone());

        assert!(controller.authorize(&session.id, "walker-1").await.is_ok());

        let mut in_progress = session.clone();
        in_progress.status = SessionStatus::InProgress;
        repo.put(in_progress);
        assert!(controller.authorize(&session.id, "walker-1").await.is_ok());

        let mut completed = session.clone();
        completed.status = SessionStatus::Completed;
        repo.put(completed);
        let err = controller
            .authorize(&session.id, "walker-1")
            .await
            .unwrap_err();
        assert!(err.is_invalid_state());
    }

    #[tokio::test]
    async fn test_pending_session_is_not_trackable() {
        let mut session = accepted_session();
        session.walker_id = None;
        session.status = SessionStatus::Pending;
        let repo = MockSessionRepository::with_session(session.clone());
        let controller = TrackingController::new(repo);

        let err = controller
            .authorize(&session.id, "owner-1")
            .await
            .unwrap_err();
        assert!(err.is_invalid_state());
    }

    #[tokio::test]
    async fn test_deleted_or_unknown_session_is_not_found() {
        let mut session = accepted_session();
        session.deleted = true;
        let repo = MockSessionRepository::with_session(session.clone());
        let controller = TrackingController::new(repo);

        let err = controller
            .authorize(&session.id, "owner-1")
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let err = controller
            .authorize("no-such-session", "owner-1")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
