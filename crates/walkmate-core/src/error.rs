//! Error types for the Walkmate application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Walkmate application.
///
/// This provides typed, structured error variants for the matching engine,
/// the tracking controller, and the storage adapters. Every variant is
/// terminal for the operation that produced it; `TransientStore` is the only
/// class a caller may retry, and only for reads or conditional updates that
/// did not take effect.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum WalkmateError {
    /// Malformed input - reported to the caller, never retried
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Entity missing or soft-deleted
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound { entity_type: String, id: String },

    /// Caller lacks the role required for the action
    #[error("Not authorized: {0}")]
    Authorization(String),

    /// Action attempted from the wrong state, including the losing side of a
    /// race on a contended session
    #[error("Cannot {action}: session is {status}")]
    InvalidState { action: String, status: String },

    /// Idempotency violation on apply
    #[error("Walker '{walker_id}' already applied to session '{session_id}'")]
    DuplicateApplication {
        session_id: String,
        walker_id: String,
    },

    /// Store unavailable or persistently contended - safe to retry with backoff
    #[error("Session store unavailable: {0}")]
    TransientStore(String),
}

impl WalkmateError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// Creates an Authorization error
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::Authorization(message.into())
    }

    /// Creates an InvalidState error
    pub fn invalid_state(action: impl Into<String>, status: impl ToString) -> Self {
        Self::InvalidState {
            action: action.into(),
            status: status.to_string(),
        }
    }

    /// Creates a DuplicateApplication error
    pub fn duplicate_application(
        session_id: impl Into<String>,
        walker_id: impl Into<String>,
    ) -> Self {
        Self::DuplicateApplication {
            session_id: session_id.into(),
            walker_id: walker_id.into(),
        }
    }

    /// Creates a TransientStore error
    pub fn transient_store(message: impl Into<String>) -> Self {
        Self::TransientStore(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an Authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::Authorization(_))
    }

    /// Check if this is an InvalidState error.
    ///
    /// Callers use this to distinguish "no longer available" (a lost race or
    /// a stale view of the session) from a validation failure.
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState { .. })
    }

    /// Check if this is a DuplicateApplication error
    pub fn is_duplicate_application(&self) -> bool {
        matches!(self, Self::DuplicateApplication { .. })
    }

    /// Check if this error is safe to retry with backoff
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientStore(_))
    }
}

/// A type alias for `Result<T, WalkmateError>`.
pub type Result<T> = std::result::Result<T, WalkmateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_state_is_distinct_from_validation() {
        let race_loser = WalkmateError::invalid_state("apply", "accepted");
        assert!(race_loser.is_invalid_state());
        assert!(!race_loser.is_validation());

        let bad_input = WalkmateError::validation("compensation must be positive");
        assert!(bad_input.is_validation());
        assert!(!bad_input.is_invalid_state());
    }

    #[test]
    fn test_error_messages() {
        let err = WalkmateError::not_found("session", "abc");
        assert_eq!(err.to_string(), "Entity not found: session 'abc'");

        let err = WalkmateError::duplicate_application("s1", "w1");
        assert_eq!(
            err.to_string(),
            "Walker 'w1' already applied to session 's1'"
        );
    }
}
