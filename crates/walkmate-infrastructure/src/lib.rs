pub mod config_service;
pub mod in_memory_pet_repository;
pub mod in_memory_profile_repository;
pub mod in_memory_session_repository;

pub use crate::config_service::ConfigService;
pub use crate::in_memory_pet_repository::InMemoryPetRepository;
pub use crate::in_memory_profile_repository::InMemoryProfileRepository;
pub use crate::in_memory_session_repository::InMemorySessionRepository;
