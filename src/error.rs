//! Error types for the match-organizing service
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the application.

/// Result type alias for convenience; the error type defaults to
/// `anyhow::Error` but can be overridden at the boundary (handlers
/// return `Result<T, ApiError>` through this same alias)
pub type Result<T, E = anyhow::Error> = std::result::Result<T, E>;

/// Custom error types for specific failure scenarios
///
/// Nothing here is fatal: every variant is converted into an HTTP status
/// plus a user-facing notice at the request boundary.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Player not found: {player_id}")]
    PlayerNotFound { player_id: String },

    #[error("Match not found: {match_id}")]
    MatchNotFound { match_id: String },

    #[error("Match is already full: {match_id}")]
    MatchFull { match_id: String },

    #[error("Player {player_id} is already signed up")]
    AlreadyEnrolled { player_id: String },

    #[error("Player {player_id} is not signed up for this match")]
    NotEnrolled { player_id: String },

    #[error("Match {match_id} has already been played")]
    MatchAlreadyPlayed { match_id: String },

    #[error("Match {match_id} has not been played yet")]
    MatchNotPlayed { match_id: String },

    #[error("Rating already submitted for this player and match")]
    DuplicateRating { rater_id: String, rated_id: String },

    #[error("Players cannot rate themselves")]
    SelfRating,

    #[error("A player with that {field} already exists")]
    PlayerAlreadyRegistered { field: String },

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal service error: {message}")]
    InternalError { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    fn defaulted() -> Result<u8> {
        Ok(1)
    }

    fn overridden() -> Result<u8, String> {
        Err("boundary error".to_string())
    }

    #[test]
    fn test_result_alias_accepts_both_arities() {
        assert_eq!(defaulted().unwrap(), 1);
        assert!(overridden().is_err());
    }

    #[test]
    fn test_default_error_type_is_anyhow() {
        let failing: Result<u8> = Err(AppError::SelfRating.into());
        let err = failing.context("while rating").unwrap_err();
        assert!(err.downcast_ref::<AppError>().is_some());
    }
}
