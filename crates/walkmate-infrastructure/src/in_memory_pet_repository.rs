//! In-memory PetRepository implementation.
//!
//! Read-only lookup over a seeded map; the production counterpart is a thin
//! wrapper over the hosted profile service.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use walkmate_core::error::Result;
use walkmate_core::profile::{PetProfile, PetRepository};

/// Pet lookup backed by a process-local map.
#[derive(Default)]
pub struct InMemoryPetRepository {
    pets: RwLock<HashMap<String, PetProfile>>,
}

impl InMemoryPetRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository seeded with the given pets.
    pub fn with_pets(pets: Vec<PetProfile>) -> Self {
        Self {
            pets: RwLock::new(pets.into_iter().map(|p| (p.id.clone(), p)).collect()),
        }
    }

    /// Registers a pet.
    pub async fn put(&self, pet: PetProfile) {
        let mut pets = self.pets.write().await;
        pets.insert(pet.id.clone(), pet);
    }
}

#[async_trait]
impl PetRepository for InMemoryPetRepository {
    async fn find_by_id(&self, pet_id: &str) -> Result<Option<PetProfile>> {
        let pets = self.pets.read().await;
        Ok(pets.get(pet_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_after_seed() {
        let repo = InMemoryPetRepository::with_pets(vec![PetProfile {
            id: "pet-1".to_string(),
            owner_id: "owner-1".to_string(),
            name: "Biscuit".to_string(),
            breed: Some("corgi".to_string()),
        }]);

        let pet = repo.find_by_id("pet-1").await.unwrap().unwrap();
        assert_eq!(pet.name, "Biscuit");
        assert!(pet.is_owned_by("owner-1"));
        assert!(repo.find_by_id("pet-2").await.unwrap().is_none());
    }
}
