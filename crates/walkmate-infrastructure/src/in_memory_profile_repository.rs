//! In-memory ProfileRepository implementation.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use walkmate_core::error::Result;
use walkmate_core::profile::{ProfileRepository, UserProfile};

/// User profile lookup backed by a process-local map.
#[derive(Default)]
pub struct InMemoryProfileRepository {
    profiles: RwLock<HashMap<String, UserProfile>>,
}

impl InMemoryProfileRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository seeded with the given profiles.
    pub fn with_profiles(profiles: Vec<UserProfile>) -> Self {
        Self {
            profiles: RwLock::new(profiles.into_iter().map(|p| (p.id.clone(), p)).collect()),
        }
    }

    /// Registers a profile.
    pub async fn put(&self, profile: UserProfile) {
        let mut profiles = self.profiles.write().await;
        profiles.insert(profile.id.clone(), profile);
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let profiles = self.profiles.read().await;
        Ok(profiles.get(user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_after_put() {
        let repo = InMemoryProfileRepository::new();
        repo.put(UserProfile {
            id: "owner-1".to_string(),
            display_name: "Ada".to_string(),
        })
        .await;

        let profile = repo.find_by_id("owner-1").await.unwrap().unwrap();
        assert_eq!(profile.display_name, "Ada");
        assert!(repo.find_by_id("owner-2").await.unwrap().is_none());
    }
}
