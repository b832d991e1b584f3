//! Pet and user profile models.

use serde::{Deserialize, Serialize};

/// A pet registered by an owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetProfile {
    /// Unique pet identifier (UUID format)
    pub id: String,
    /// Identity of the owning user
    pub owner_id: String,
    /// Display name of the pet
    pub name: String,
    /// Breed, when known
    #[serde(default)]
    pub breed: Option<String>,
}

impl PetProfile {
    /// Returns true when the pet belongs to the given identity.
    pub fn is_owned_by(&self, identity: &str) -> bool {
        self.owner_id == identity
    }
}

/// A user profile as seen by the display layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique user identifier (UUID format)
    pub id: String,
    /// Display name shown to the counterpart during a walk
    pub display_name: String,
}
