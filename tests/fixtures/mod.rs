//! Shared fixtures for integration tests

use fulbito::auth::PlaintextHasher;
use fulbito::config::AppConfig;
use fulbito::service::AppState;
use fulbito::storage::{InMemoryMatchStore, InMemoryPlayerStore, InMemoryRatingStore};
use fulbito::types::{Match, Player, PlayerId};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

/// Service context over fresh in-memory stores, with plaintext
/// credential hashing so tests never pay the bcrypt cost
pub fn test_state() -> AppState {
    AppState::with_components(
        AppConfig::default(),
        Arc::new(InMemoryPlayerStore::new()),
        Arc::new(InMemoryMatchStore::new()),
        Arc::new(InMemoryRatingStore::new()),
        Arc::new(PlaintextHasher),
    )
    .unwrap()
}

/// Register a player with a password through the store and hasher
pub fn register_player(state: &AppState, name: &str, email: &str) -> Player {
    let digest = state.hasher.hash("secreto").unwrap();
    state
        .players
        .create_player(Player::new(
            name.to_string(),
            "Test".to_string(),
            email.to_string(),
            Some(digest),
        ))
        .unwrap()
}

/// Create a stored match whose scheduled date is already in the past,
/// with the given players on the roster. Creation and signups happen at
/// a clock position before the date; `Utc::now()` lands after it.
pub fn played_match_with(state: &AppState, roster: &[PlayerId]) -> Match {
    let organizing_time = Utc::now() - Duration::days(2);
    let scheduled_at = organizing_time + Duration::days(1);

    let m = Match::create(
        "La Canchita".to_string(),
        "Av. Siempreviva 742".to_string(),
        scheduled_at,
        roster.len().max(2),
        roster[0],
        organizing_time,
    )
    .unwrap();
    let m = state.matches.create_match(m).unwrap();

    for player_id in roster {
        state
            .matches
            .update_match(m.id, &mut |m| m.signup(*player_id, organizing_time))
            .unwrap();
    }

    state.matches.get_match(m.id).unwrap().unwrap()
}

/// Create a stored match scheduled for tomorrow with an empty roster
pub fn upcoming_match(state: &AppState, organizer: PlayerId, players_needed: usize) -> Match {
    let now = Utc::now();
    let m = Match::create(
        "El Galpon".to_string(),
        "Calle Falsa 123".to_string(),
        now + Duration::days(1),
        players_needed,
        organizer,
        now,
    )
    .unwrap();
    state.matches.create_match(m).unwrap()
}

/// A clock position safely after the given match's scheduled date
pub fn after_match(m: &Match) -> DateTime<Utc> {
    m.scheduled_at + Duration::hours(3)
}
