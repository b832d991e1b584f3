//! Matching engine.
//!
//! Owns the session state machine: creation, application, acceptance and
//! rejection of applicants, status advancement, cancellation, completion and
//! soft deletion. All invariants over the applicant list and the walker
//! assignment are enforced here.
//!
//! Every mutation follows the same shape: read the session, validate against
//! the freshly read state, write back through a version-guarded conditional
//! update. On a version conflict the whole read-validate-write round is
//! repeated, so a caller that lost a race re-validates against the winner's
//! state and receives `InvalidState` ("no longer available") instead of
//! silently clobbering it.

use super::model::{SessionKind, SessionStatus, WalkSchedule, WalkSession};
use super::repository::{CommitOutcome, SessionRepository};
use crate::config::MatchingSettings;
use crate::error::{Result, WalkmateError};
use crate::profile::PetRepository;
use chrono::Utc;
use std::sync::Arc;

/// The session state machine service.
///
/// Operations on different session ids are fully independent; within one
/// session id writers serialize through the store's conditional update.
pub struct MatchingEngine {
    sessions: Arc<dyn SessionRepository>,
    pets: Arc<dyn PetRepository>,
    settings: MatchingSettings,
}

impl MatchingEngine {
    /// Creates a new `MatchingEngine` with default settings.
    pub fn new(sessions: Arc<dyn SessionRepository>, pets: Arc<dyn PetRepository>) -> Self {
        Self::with_settings(sessions, pets, MatchingSettings::default())
    }

    /// Creates a new `MatchingEngine` with explicit settings.
    pub fn with_settings(
        sessions: Arc<dyn SessionRepository>,
        pets: Arc<dyn PetRepository>,
        settings: MatchingSettings,
    ) -> Self {
        Self {
            sessions,
            pets,
            settings,
        }
    }

    /// Creates a new session in `Pending`.
    ///
    /// # Errors
    ///
    /// `Validation` if the compensation is not positive, the schedule
    /// duration is zero, or the pet does not belong to the owner.
    pub async fn create_session(
        &self,
        owner_id: &str,
        pet_id: &str,
        kind: SessionKind,
        schedule: WalkSchedule,
        compensation: i64,
    ) -> Result<WalkSession> {
        validate_terms(&schedule, compensation)?;

        let pet = self
            .pets
            .find_by_id(pet_id)
            .await?
            .ok_or_else(|| WalkmateError::not_found("pet", pet_id))?;
        if !pet.is_owned_by(owner_id) {
            return Err(WalkmateError::validation(format!(
                "pet '{}' does not belong to '{}'",
                pet_id, owner_id
            )));
        }

        let session = WalkSession::new(owner_id, pet_id, kind, schedule, compensation);
        self.sessions.insert(&session).await?;
        tracing::info!(
            target: "matching",
            "created {} session '{}' for owner '{}'",
            session.kind, session.id, owner_id
        );
        Ok(session)
    }

    /// Edits schedule and compensation of a `Pending` session.
    ///
    /// Scheduling attributes are immutable once the session leaves `Pending`;
    /// this is the one sanctioned edit path.
    pub async fn edit_session(
        &self,
        session_id: &str,
        owner_id: &str,
        schedule: WalkSchedule,
        compensation: i64,
    ) -> Result<WalkSession> {
        validate_terms(&schedule, compensation)?;
        let owner_id = owner_id.to_string();
        self.commit(session_id, "edit", move |current| {
            if current.owner_id != owner_id {
                return Err(WalkmateError::authorization(
                    "only the owner may edit a session",
                ));
            }
            if current.status != SessionStatus::Pending {
                return Err(WalkmateError::invalid_state("edit", current.status));
            }
            let mut next = current.clone();
            next.schedule = schedule;
            next.compensation = compensation;
            Ok(next)
        })
        .await
    }

    /// Applies a walker to a `Pending` session.
    ///
    /// For `Broadcast` sessions the first application performs the
    /// acceptance atomically: the applicant list is cleared, the walker is
    /// assigned and the status advances to `Accepted`, all in one
    /// conditional update. For `Scheduled` sessions the applicant list grows
    /// and the status stays `Pending`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session is unknown or soft-deleted
    /// - `InvalidState` if the session is no longer `Pending` (including the
    ///   losing side of a race on a `Broadcast` session)
    /// - `Validation` if the owner applies to their own session
    /// - `DuplicateApplication` if the walker already applied
    pub async fn apply(&self, session_id: &str, walker_id: &str) -> Result<WalkSession> {
        let walker_id = walker_id.to_string();
        let updated = self
            .commit(session_id, "apply", move |current| {
                if current.status != SessionStatus::Pending {
                    return Err(WalkmateError::invalid_state("apply", current.status));
                }
                if current.owner_id == walker_id {
                    return Err(WalkmateError::validation(
                        "owner cannot apply to their own session",
                    ));
                }
                if current.has_applicant(&walker_id) {
                    return Err(WalkmateError::duplicate_application(
                        current.id.clone(),
                        walker_id.clone(),
                    ));
                }
                let mut next = current.clone();
                match current.kind {
                    SessionKind::Broadcast => {
                        next.applicants.clear();
                        next.walker_id = Some(walker_id.clone());
                        next.status = SessionStatus::Accepted;
                    }
                    SessionKind::Scheduled => {
                        next.applicants.push(walker_id.clone());
                    }
                }
                Ok(next)
            })
            .await?;

        match updated.status {
            SessionStatus::Accepted => tracing::info!(
                target: "matching",
                "session '{}' auto-accepted walker '{}'",
                updated.id,
                updated.walker_id.as_deref().unwrap_or_default()
            ),
            _ => tracing::debug!(
                target: "matching",
                "session '{}' now has {} applicant(s)",
                updated.id, updated.applicants.len()
            ),
        }
        Ok(updated)
    }

    /// Accepts one applicant on behalf of the owner.
    ///
    /// Atomically assigns the walker, clears the applicant list and advances
    /// the status to `Accepted`.
    ///
    /// # Errors
    ///
    /// - `Authorization` if the caller is not the owner
    /// - `InvalidState` if the session is not `Pending`
    /// - `Validation` if the walker never applied
    pub async fn accept_applicant(
        &self,
        session_id: &str,
        owner_id: &str,
        walker_id: &str,
    ) -> Result<WalkSession> {
        let owner_id = owner_id.to_string();
        let walker_id = walker_id.to_string();
        let updated = self
            .commit(session_id, "accept", move |current| {
                if current.owner_id != owner_id {
                    return Err(WalkmateError::authorization(
                        "only the owner may accept an applicant",
                    ));
                }
                if current.status != SessionStatus::Pending {
                    return Err(WalkmateError::invalid_state("accept", current.status));
                }
                if !current.has_applicant(&walker_id) {
                    return Err(WalkmateError::validation(format!(
                        "walker '{}' has not applied to this session",
                        walker_id
                    )));
                }
                let mut next = current.clone();
                next.applicants.clear();
                next.walker_id = Some(walker_id.clone());
                next.status = SessionStatus::Accepted;
                Ok(next)
            })
            .await?;

        tracing::info!(
            target: "matching",
            "session '{}' accepted walker '{}'",
            updated.id,
            updated.walker_id.as_deref().unwrap_or_default()
        );
        Ok(updated)
    }

    /// Removes a walker from the applicant list; the status is unchanged.
    ///
    /// Idempotent: rejecting a walker who is not on the list is a no-op
    /// success, not an error.
    pub async fn reject_applicant(
        &self,
        session_id: &str,
        owner_id: &str,
        walker_id: &str,
    ) -> Result<WalkSession> {
        let current = self.load_live(session_id).await?;
        if current.owner_id != owner_id {
            return Err(WalkmateError::authorization(
                "only the owner may reject an applicant",
            ));
        }
        if !current.has_applicant(walker_id) {
            // Already absent; nothing to write.
            return Ok(current);
        }

        let walker_id = walker_id.to_string();
        let owner_id = owner_id.to_string();
        self.commit(session_id, "reject", move |current| {
            if current.owner_id != owner_id {
                return Err(WalkmateError::authorization(
                    "only the owner may reject an applicant",
                ));
            }
            let mut next = current.clone();
            next.applicants.retain(|a| a != &walker_id);
            Ok(next)
        })
        .await
    }

    /// Advances an `Accepted` session to `InProgress`.
    ///
    /// Permitted for either assigned party.
    pub async fn advance_to_in_progress(
        &self,
        session_id: &str,
        actor_id: &str,
    ) -> Result<WalkSession> {
        let actor_id = actor_id.to_string();
        let updated = self
            .commit(session_id, "start", move |current| {
                if !current.is_participant(&actor_id) {
                    return Err(WalkmateError::authorization(
                        "only a session participant may start the walk",
                    ));
                }
                if current.status != SessionStatus::Accepted {
                    return Err(WalkmateError::invalid_state("start", current.status));
                }
                let mut next = current.clone();
                next.status = SessionStatus::InProgress;
                Ok(next)
            })
            .await?;

        tracing::info!(target: "matching", "session '{}' is now in progress", updated.id);
        Ok(updated)
    }

    /// Completes an `InProgress` session and stamps its end time.
    ///
    /// Permitted for either assigned party. Terminal.
    pub async fn complete_session(&self, session_id: &str, actor_id: &str) -> Result<WalkSession> {
        let actor_id = actor_id.to_string();
        let updated = self
            .commit(session_id, "complete", move |current| {
                if !current.is_participant(&actor_id) {
                    return Err(WalkmateError::authorization(
                        "only a session participant may complete the walk",
                    ));
                }
                if current.status != SessionStatus::InProgress {
                    return Err(WalkmateError::invalid_state("complete", current.status));
                }
                let mut next = current.clone();
                next.status = SessionStatus::Completed;
                next.ended_at = Some(Utc::now());
                Ok(next)
            })
            .await?;

        tracing::info!(target: "matching", "session '{}' completed", updated.id);
        Ok(updated)
    }

    /// Cancels a `Pending` or `Accepted` session.
    ///
    /// Owner only. Clears the walker assignment if one exists. Terminal: a
    /// cancelled session never advances to `Completed`.
    pub async fn cancel_session(&self, session_id: &str, actor_id: &str) -> Result<WalkSession> {
        let actor_id = actor_id.to_string();
        let updated = self
            .commit(session_id, "cancel", move |current| {
                if current.owner_id != actor_id {
                    return Err(WalkmateError::authorization(
                        "only the owner may cancel a session",
                    ));
                }
                if !matches!(
                    current.status,
                    SessionStatus::Pending | SessionStatus::Accepted
                ) {
                    return Err(WalkmateError::invalid_state("cancel", current.status));
                }
                let mut next = current.clone();
                next.walker_id = None;
                next.status = SessionStatus::Cancelled;
                Ok(next)
            })
            .await?;

        tracing::info!(target: "matching", "session '{}' cancelled", updated.id);
        Ok(updated)
    }

    /// Soft-deletes a `Pending` session.
    ///
    /// Owner only. The status is unchanged; the session disappears from
    /// listings but stays retrievable for audit. Disallowed on any other
    /// status, including `Completed`.
    pub async fn delete_session(&self, session_id: &str, owner_id: &str) -> Result<()> {
        let owner_id = owner_id.to_string();
        self.commit(session_id, "delete", move |current| {
            if current.owner_id != owner_id {
                return Err(WalkmateError::authorization(
                    "only the owner may delete a session",
                ));
            }
            if current.status != SessionStatus::Pending {
                return Err(WalkmateError::invalid_state("delete", current.status));
            }
            let mut next = current.clone();
            next.deleted = true;
            Ok(next)
        })
        .await?;

        tracing::info!(target: "matching", "session '{}' soft-deleted", session_id);
        Ok(())
    }

    /// Loads a session, treating unknown and soft-deleted ids alike.
    async fn load_live(&self, session_id: &str) -> Result<WalkSession> {
        match self.sessions.find_by_id(session_id).await? {
            Some(session) if !session.deleted => Ok(session),
            _ => Err(WalkmateError::not_found("session", session_id)),
        }
    }

    /// Runs one read-validate-write round, retrying on version conflict.
    ///
    /// The mutation closure is re-invoked against the freshly read state on
    /// every round, so its validations decide whether a conflict loser gets
    /// a retry (state still compatible) or a terminal error (state moved on).
    async fn commit<F>(&self, session_id: &str, action: &'static str, mutate: F) -> Result<WalkSession>
    where
        F: Fn(&WalkSession) -> Result<WalkSession>,
    {
        let mut attempt = 0;
        loop {
            let current = self.load_live(session_id).await?;
            let mut next = mutate(&current)?;
            next.version = current.version + 1;
            next.updated_at = Utc::now();

            match self.sessions.update(&next, current.version).await? {
                CommitOutcome::Applied => return Ok(next),
                CommitOutcome::VersionConflict => {
                    attempt += 1;
                    tracing::debug!(
                        target: "matching",
                        "version conflict on session '{}' during {} (attempt {})",
                        session_id, action, attempt
                    );
                    if attempt >= self.settings.max_commit_retries {
                        return Err(WalkmateError::transient_store(format!(
                            "session '{}' stayed contended over {} attempts",
                            session_id, attempt
                        )));
                    }
                }
            }
        }
    }
}

fn validate_terms(schedule: &WalkSchedule, compensation: i64) -> Result<()> {
    if compensation <= 0 {
        return Err(WalkmateError::validation("compensation must be positive"));
    }
    if schedule.duration_minutes == 0 {
        return Err(WalkmateError::validation(
            "schedule duration must be positive",
        ));
    }
    Ok(())
}
