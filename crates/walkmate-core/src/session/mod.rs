//! Session domain module.
//!
//! This module contains the walk-session domain model, the repository
//! interface against the session store, and the matching engine that owns
//! the session state machine.
//!
//! # Module Structure
//!
//! - `model`: Core session domain model (`WalkSession`, `SessionStatus`,
//!   `SessionKind`, `WalkSchedule`)
//! - `repository`: Repository trait for the session store, including the
//!   version-guarded conditional update
//! - `matching`: The matching engine (`MatchingEngine`)

mod matching;
mod model;
mod repository;


// Re-export public API
pub use matching::MatchingEngine;
pub use model::{SessionKind, SessionStatus, WalkSchedule, WalkSession};
pub use repository::{CommitOutcome, SessionFilter, SessionRepository};
