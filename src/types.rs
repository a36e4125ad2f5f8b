//! Common types used throughout the match-organizing service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for players
pub type PlayerId = Uuid;

/// Unique identifier for matches
pub type MatchId = Uuid;

/// The five rated skills of a player, each expected in a bounded range
/// (0-10 by default; the bound is validated at the request boundary,
/// not here).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SkillScores {
    pub attack: f64,
    pub defense: f64,
    pub physical: f64,
    pub passing: f64,
    pub vision: f64,
}

impl SkillScores {
    pub fn new(attack: f64, defense: f64, physical: f64, passing: f64, vision: f64) -> Self {
        Self {
            attack,
            defense,
            physical,
            passing,
            vision,
        }
    }

    /// Arithmetic mean of the five skills
    pub fn overall(&self) -> f64 {
        (self.attack + self.defense + self.physical + self.passing + self.vision) / 5.0
    }

    /// The five scores in declaration order
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.attack,
            self.defense,
            self.physical,
            self.passing,
            self.vision,
        ]
    }

    /// Check that every score lies within `[min, max]`
    pub fn within_bounds(&self, min: f64, max: f64) -> bool {
        self.as_array().iter().all(|s| (min..=max).contains(s))
    }
}

/// A registered player with rolling per-skill averages
///
/// `overall` always equals the mean of the five skill scores and is
/// recomputed on every aggregator update; `matches_played` counts how
/// many rating vectors have been folded in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub surname: String,
    pub email: String,
    /// Bcrypt digest; absent for legacy registrations without a password
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    pub skills: SkillScores,
    pub overall: f64,
    pub matches_played: u32,
    pub created_at: DateTime<Utc>,
}

impl Player {
    /// Create a fresh player with zeroed skills
    pub fn new(name: String, surname: String, email: String, password_hash: Option<String>) -> Self {
        Self {
            id: crate::utils::generate_player_id(),
            name,
            surname,
            email,
            password_hash,
            skills: SkillScores::default(),
            overall: 0.0,
            matches_played: 0,
            created_at: Utc::now(),
        }
    }
}

/// A scheduled match with a capacity and a roster of signed-up players
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub venue: String,
    pub location: String,
    pub scheduled_at: DateTime<Utc>,
    pub players_needed: usize,
    /// Signed-up players in signup order, never exceeding `players_needed`
    pub roster: Vec<PlayerId>,
    pub organizer_id: PlayerId,
    pub created_at: DateTime<Utc>,
}

/// One participant's skill assessment of another, scoped to one match
///
/// At most one rating exists per (rater, rated, match) triple; ratings
/// are never updated or deleted once stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    pub rater_id: PlayerId,
    pub rated_id: PlayerId,
    pub match_id: MatchId,
    pub scores: SkillScores,
    pub submitted_at: DateTime<Utc>,
}

/// Registration form (the legacy flow sends only name and email)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterPlayerRequest {
    pub name: String,
    #[serde(default)]
    pub surname: Option<String>,
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
}

/// Login form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Match creation form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMatchRequest {
    pub venue: String,
    pub location: String,
    pub scheduled_at: DateTime<Utc>,
    pub players_needed: usize,
}

/// Match detail response with the derived past flag
#[derive(Debug, Clone, Serialize)]
pub struct MatchDetail {
    #[serde(flatten)]
    pub info: Match,
    pub is_past: bool,
}

/// The two balanced squads computed from a roster
#[derive(Debug, Clone, Serialize)]
pub struct BalancedTeams {
    pub team_a: Vec<Player>,
    pub team_b: Vec<Player>,
}

/// Rating progress for one past match of the current user
#[derive(Debug, Clone, Serialize)]
pub struct PastMatchEntry {
    #[serde(flatten)]
    pub info: Match,
    pub teammates_count: usize,
    pub ratings_given: usize,
    /// `ratings_given >= teammates_count`
    pub completed: bool,
}

/// Teammates still to rate vs. already rated by the current user
#[derive(Debug, Clone, Serialize)]
pub struct RatingChecklist {
    pub pending: Vec<Player>,
    pub rated: Vec<Player>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overall_is_mean_of_five() {
        let scores = SkillScores::new(8.0, 7.0, 6.0, 9.0, 5.0);
        assert_eq!(scores.overall(), 7.0);
    }

    #[test]
    fn test_within_bounds() {
        let scores = SkillScores::new(0.0, 10.0, 5.0, 5.0, 5.0);
        assert!(scores.within_bounds(0.0, 10.0));
        assert!(!scores.within_bounds(1.0, 10.0));
        assert!(!SkillScores::new(11.0, 5.0, 5.0, 5.0, 5.0).within_bounds(0.0, 10.0));
    }

    #[test]
    fn test_new_player_starts_from_zero() {
        let player = Player::new(
            "Ana".to_string(),
            "Diaz".to_string(),
            "ana@example.com".to_string(),
            None,
        );
        assert_eq!(player.matches_played, 0);
        assert_eq!(player.overall, 0.0);
        assert_eq!(player.skills.as_array(), [0.0; 5]);
    }
}
