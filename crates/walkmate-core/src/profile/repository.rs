//! Profile repository traits.
//!
//! Read-only lookup interfaces. The hosted profile service sits behind these
//! traits; the in-memory implementations live in the infrastructure crate.

use super::model::{PetProfile, UserProfile};
use crate::error::Result;
use async_trait::async_trait;

/// Read-only lookup for pet profiles.
#[async_trait]
pub trait PetRepository: Send + Sync {
    /// Finds a pet by its ID.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(PetProfile))`: Pet found
    /// - `Ok(None)`: Pet not found
    /// - `Err(_)`: Lookup failed (store unavailable)
    async fn find_by_id(&self, pet_id: &str) -> Result<Option<PetProfile>>;
}

/// Read-only lookup for user profiles.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Finds a user profile by its ID.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(UserProfile))`: Profile found
    /// - `Ok(None)`: Profile not found
    /// - `Err(_)`: Lookup failed (store unavailable)
    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserProfile>>;
}
