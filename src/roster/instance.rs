//! Match roster state machine
//!
//! A match moves through three phases: `Open` (before its scheduled
//! date, under capacity), `Full` (signups reached capacity) and `Past`
//! (scheduled date has gone by). Signups and withdrawals are legal only
//! before the date; ratings only after it. Every rejected transition is
//! a recoverable state-conflict error, never a hard failure.

use crate::error::{AppError, Result};
use crate::types::{Match, MatchId, PlayerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Phase of a match roster, derived from the clock and the roster size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RosterPhase {
    /// Before the scheduled date, with open spots
    Open,
    /// Signups reached capacity; still before the scheduled date
    Full,
    /// Scheduled date has passed; roster is frozen, rating is open
    Past,
}

impl std::fmt::Display for RosterPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterPhase::Open => write!(f, "Open"),
            RosterPhase::Full => write!(f, "Full"),
            RosterPhase::Past => write!(f, "Past"),
        }
    }
}

impl Match {
    /// Create a match for an organizer; a scheduled date in the past is
    /// a validation error.
    pub fn create(
        venue: String,
        location: String,
        scheduled_at: DateTime<Utc>,
        players_needed: usize,
        organizer_id: PlayerId,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        if scheduled_at <= now {
            return Err(AppError::InvalidRequest {
                reason: "scheduled date is in the past".to_string(),
            }
            .into());
        }
        if players_needed < 2 {
            return Err(AppError::InvalidRequest {
                reason: "a match needs at least 2 players".to_string(),
            }
            .into());
        }

        Ok(Self {
            id: crate::utils::generate_match_id(),
            venue,
            location,
            scheduled_at,
            players_needed,
            roster: Vec::new(),
            organizer_id,
            created_at: now,
        })
    }

    /// Current phase of the roster
    pub fn phase(&self, now: DateTime<Utc>) -> RosterPhase {
        if now >= self.scheduled_at {
            RosterPhase::Past
        } else if self.roster.len() >= self.players_needed {
            RosterPhase::Full
        } else {
            RosterPhase::Open
        }
    }

    /// Whether the scheduled date has gone by
    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        self.phase(now) == RosterPhase::Past
    }

    pub fn is_enrolled(&self, player_id: PlayerId) -> bool {
        self.roster.contains(&player_id)
    }

    /// Everyone on the roster except the given player
    pub fn teammates_of(&self, player_id: PlayerId) -> Vec<PlayerId> {
        self.roster
            .iter()
            .copied()
            .filter(|id| *id != player_id)
            .collect()
    }

    /// Add a player to the roster.
    ///
    /// Legal only while the match is in the future, the player is not
    /// already enrolled and the roster has an open spot. The capacity
    /// check and the append must run under one store write lock; see
    /// `MatchStore::update_match`.
    pub fn signup(&mut self, player_id: PlayerId, now: DateTime<Utc>) -> Result<()> {
        if self.is_past(now) {
            return Err(AppError::MatchAlreadyPlayed {
                match_id: self.id.to_string(),
            }
            .into());
        }
        if self.is_enrolled(player_id) {
            return Err(AppError::AlreadyEnrolled {
                player_id: player_id.to_string(),
            }
            .into());
        }
        if self.roster.len() >= self.players_needed {
            return Err(AppError::MatchFull {
                match_id: self.id.to_string(),
            }
            .into());
        }

        self.roster.push(player_id);
        Ok(())
    }

    /// Remove a player from the roster; legal only while the match date
    /// is still in the future.
    pub fn withdraw(&mut self, player_id: PlayerId, now: DateTime<Utc>) -> Result<()> {
        if self.is_past(now) {
            return Err(AppError::MatchAlreadyPlayed {
                match_id: self.id.to_string(),
            }
            .into());
        }
        if !self.is_enrolled(player_id) {
            return Err(AppError::NotEnrolled {
                player_id: player_id.to_string(),
            }
            .into());
        }

        self.roster.retain(|id| *id != player_id);
        Ok(())
    }

    /// Check the preconditions for one participant rating another.
    ///
    /// Requires the match to be in the past and both players enrolled.
    /// Self-rating is rejected here; the duplicate-triple check belongs
    /// to the rating store.
    pub fn check_can_rate(
        &self,
        rater_id: PlayerId,
        rated_id: PlayerId,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if !self.is_past(now) {
            return Err(AppError::MatchNotPlayed {
                match_id: self.id.to_string(),
            }
            .into());
        }
        if rater_id == rated_id {
            return Err(AppError::SelfRating.into());
        }
        for id in [rater_id, rated_id] {
            if !self.is_enrolled(id) {
                return Err(AppError::NotEnrolled {
                    player_id: id.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}

/// Convenience for handlers that only have a match id on hand
pub fn match_not_found(match_id: MatchId) -> anyhow::Error {
    AppError::MatchNotFound {
        match_id: match_id.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn future_match(players_needed: usize) -> (Match, DateTime<Utc>) {
        let now = Utc::now();
        let m = Match::create(
            "La Canchita".to_string(),
            "Av. Siempreviva 742".to_string(),
            now + Duration::days(1),
            players_needed,
            Uuid::new_v4(),
            now,
        )
        .unwrap();
        (m, now)
    }

    fn expect_app_error(result: Result<()>) -> AppError {
        result.unwrap_err().downcast::<AppError>().unwrap()
    }

    #[test]
    fn test_create_rejects_past_date() {
        let now = Utc::now();
        let result = Match::create(
            "La Canchita".to_string(),
            "Av. Siempreviva 742".to_string(),
            now - Duration::hours(1),
            10,
            Uuid::new_v4(),
            now,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_phase_transitions() {
        let (mut m, now) = future_match(2);
        assert_eq!(m.phase(now), RosterPhase::Open);

        m.signup(Uuid::new_v4(), now).unwrap();
        m.signup(Uuid::new_v4(), now).unwrap();
        assert_eq!(m.phase(now), RosterPhase::Full);

        // Past dominates Full once the date goes by.
        assert_eq!(m.phase(now + Duration::days(2)), RosterPhase::Past);
    }

    #[test]
    fn test_signup_rejected_when_full() {
        let (mut m, now) = future_match(2);
        m.signup(Uuid::new_v4(), now).unwrap();
        m.signup(Uuid::new_v4(), now).unwrap();

        let err = expect_app_error(m.signup(Uuid::new_v4(), now));
        assert!(matches!(err, AppError::MatchFull { .. }));
    }

    #[test]
    fn test_double_signup_rejected_without_state_change() {
        let (mut m, now) = future_match(4);
        let player = Uuid::new_v4();
        m.signup(player, now).unwrap();

        let err = expect_app_error(m.signup(player, now));
        assert!(matches!(err, AppError::AlreadyEnrolled { .. }));
        assert_eq!(m.roster.len(), 1);
    }

    #[test]
    fn test_signup_rejected_after_date() {
        let (mut m, now) = future_match(4);
        let err = expect_app_error(m.signup(Uuid::new_v4(), now + Duration::days(2)));
        assert!(matches!(err, AppError::MatchAlreadyPlayed { .. }));
    }

    #[test]
    fn test_withdraw_before_date_removes_player() {
        let (mut m, now) = future_match(4);
        let player = Uuid::new_v4();
        m.signup(player, now).unwrap();

        m.withdraw(player, now).unwrap();
        assert!(!m.is_enrolled(player));
    }

    #[test]
    fn test_withdraw_after_date_rejected() {
        let (mut m, now) = future_match(4);
        let player = Uuid::new_v4();
        m.signup(player, now).unwrap();

        let err = expect_app_error(m.withdraw(player, now + Duration::days(2)));
        assert!(matches!(err, AppError::MatchAlreadyPlayed { .. }));
        assert!(m.is_enrolled(player));
    }

    #[test]
    fn test_withdraw_requires_enrollment() {
        let (mut m, now) = future_match(4);
        let err = expect_app_error(m.withdraw(Uuid::new_v4(), now));
        assert!(matches!(err, AppError::NotEnrolled { .. }));
    }

    #[test]
    fn test_rating_requires_past_match() {
        let (mut m, now) = future_match(2);
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        m.signup(a, now).unwrap();
        m.signup(b, now).unwrap();

        let err = expect_app_error(m.check_can_rate(a, b, now));
        assert!(matches!(err, AppError::MatchNotPlayed { .. }));

        assert!(m.check_can_rate(a, b, now + Duration::days(2)).is_ok());
    }

    #[test]
    fn test_rating_rejects_self_and_outsiders() {
        let (mut m, now) = future_match(2);
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        m.signup(a, now).unwrap();
        m.signup(b, now).unwrap();
        let later = now + Duration::days(2);

        let err = expect_app_error(m.check_can_rate(a, a, later));
        assert!(matches!(err, AppError::SelfRating));

        let err = expect_app_error(m.check_can_rate(a, Uuid::new_v4(), later));
        assert!(matches!(err, AppError::NotEnrolled { .. }));
    }

    #[test]
    fn test_teammates_excludes_self() {
        let (mut m, now) = future_match(3);
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        m.signup(a, now).unwrap();
        m.signup(b, now).unwrap();
        m.signup(c, now).unwrap();

        let teammates = m.teammates_of(a);
        assert_eq!(teammates, vec![b, c]);
    }
}
