//! Session browsing use case.
//!
//! Listing and display enrichment on top of the session store. The pet and
//! profile lookups are presentation sugar only: when one fails or comes back
//! empty, the view degrades to the raw id instead of failing the request.

use std::sync::Arc;
use walkmate_core::WalkmateError;
use walkmate_core::error::Result;
use walkmate_core::profile::{PetRepository, ProfileRepository};
use walkmate_core::session::{SessionFilter, SessionRepository, SessionStatus, WalkSession};

/// A session enriched with display names for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub session: WalkSession,
    pub pet_name: String,
    pub owner_name: String,
    pub walker_name: Option<String>,
}

/// Use case for browsing sessions.
pub struct SessionUseCase {
    sessions: Arc<dyn SessionRepository>,
    pets: Arc<dyn PetRepository>,
    profiles: Arc<dyn ProfileRepository>,
}

impl SessionUseCase {
    /// Creates a new `SessionUseCase`.
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        pets: Arc<dyn PetRepository>,
        profiles: Arc<dyn ProfileRepository>,
    ) -> Self {
        Self {
            sessions,
            pets,
            profiles,
        }
    }

    /// Lists sessions open for application: `Pending` and not deleted.
    pub async fn list_open_sessions(&self) -> Result<Vec<WalkSession>> {
        self.sessions
            .list(&SessionFilter {
                status: Some(SessionStatus::Pending),
                ..Default::default()
            })
            .await
    }

    /// Lists sessions created by an owner.
    pub async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<WalkSession>> {
        self.sessions
            .list(&SessionFilter {
                owner_id: Some(owner_id.to_string()),
                ..Default::default()
            })
            .await
    }

    /// Lists sessions assigned to a walker.
    pub async fn list_for_walker(&self, walker_id: &str) -> Result<Vec<WalkSession>> {
        self.sessions
            .list(&SessionFilter {
                walker_id: Some(walker_id.to_string()),
                ..Default::default()
            })
            .await
    }

    /// Fetches one session enriched with pet and participant display names.
    pub async fn session_view(&self, session_id: &str) -> Result<SessionView> {
        let session = match self.sessions.find_by_id(session_id).await? {
            Some(session) if !session.deleted => session,
            _ => return Err(WalkmateError::not_found("session", session_id)),
        };

        let pet_name = self.pet_name_or_id(&session.pet_id).await;
        let owner_name = self.display_name_or_id(&session.owner_id).await;
        let walker_name = match session.walker_id {
            Some(ref walker_id) => Some(self.display_name_or_id(walker_id).await),
            None => None,
        };

        Ok(SessionView {
            session,
            pet_name,
            owner_name,
            walker_name,
        })
    }

    async fn pet_name_or_id(&self, pet_id: &str) -> String {
        match self.pets.find_by_id(pet_id).await {
            Ok(Some(pet)) => pet.name,
            Ok(None) => pet_id.to_string(),
            Err(e) => {
                tracing::warn!(target: "sessions", "pet lookup failed for '{}': {}", pet_id, e);
                pet_id.to_string()
            }
        }
    }

    async fn display_name_or_id(&self, user_id: &str) -> String {
        match self.profiles.find_by_id(user_id).await {
            Ok(Some(profile)) => profile.display_name,
            Ok(None) => user_id.to_string(),
            Err(e) => {
                tracing::warn!(
                    target: "sessions",
                    "profile lookup failed for '{}': {}",
                    user_id, e
                );
                user_id.to_string()
            }
        }
    }
}
