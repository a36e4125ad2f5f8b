//! Utility functions for the match-organizing service

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a new unique player ID
pub fn generate_player_id() -> Uuid {
    Uuid::new_v4()
}

/// Generate a new unique match ID
pub fn generate_match_id() -> Uuid {
    Uuid::new_v4()
}

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Compare two scores with a small tolerance for accumulated float error
pub fn scores_roughly_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_unique_ids() {
        assert_ne!(generate_player_id(), generate_player_id());
        assert_ne!(generate_match_id(), generate_match_id());
    }

    #[test]
    fn test_scores_roughly_equal() {
        assert!(scores_roughly_equal(7.0, 7.0 + 1e-12));
        assert!(!scores_roughly_equal(7.0, 7.1));
    }
}
