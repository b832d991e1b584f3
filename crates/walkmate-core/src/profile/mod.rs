//! Profile domain module.
//!
//! Read-only pet and user profile lookups. These collaborators enrich
//! displayed session data and validate pet ownership at creation time; they
//! are not required for state-machine correctness.

mod model;
mod repository;

pub use model::{PetProfile, UserProfile};
pub use repository::{PetRepository, ProfileRepository};
