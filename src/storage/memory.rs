//! In-memory storage implementations
//!
//! All three stores keep their records in a `RwLock<HashMap>`; every
//! mutation is one atomic read-modify-write under the write lock, which
//! stands in for the transaction boundary a relational store would
//! provide per request.

use crate::error::{AppError, Result};
use crate::storage::{MatchStore, PlayerStore, RatingStore};
use crate::types::{Match, MatchId, Player, PlayerId, Rating};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

fn lock_poisoned(what: &str) -> AppError {
    AppError::InternalError {
        message: format!("Failed to acquire {} lock", what),
    }
}

/// In-memory player storage
#[derive(Debug, Default)]
pub struct InMemoryPlayerStore {
    players: RwLock<HashMap<PlayerId, Player>>,
}

impl InMemoryPlayerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlayerStore for InMemoryPlayerStore {
    fn create_player(&self, player: Player) -> Result<Player> {
        let mut players = self
            .players
            .write()
            .map_err(|_| lock_poisoned("players write"))?;

        // Uniqueness constraints the relational schema would carry.
        for existing in players.values() {
            if existing.email == player.email {
                return Err(AppError::PlayerAlreadyRegistered {
                    field: "email".to_string(),
                }
                .into());
            }
            if existing.name == player.name {
                return Err(AppError::PlayerAlreadyRegistered {
                    field: "name".to_string(),
                }
                .into());
            }
        }

        players.insert(player.id, player.clone());
        Ok(player)
    }

    fn get_player(&self, player_id: PlayerId) -> Result<Option<Player>> {
        let players = self
            .players
            .read()
            .map_err(|_| lock_poisoned("players read"))?;

        Ok(players.get(&player_id).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Player>> {
        let players = self
            .players
            .read()
            .map_err(|_| lock_poisoned("players read"))?;

        Ok(players.values().find(|p| p.email == email).cloned())
    }

    fn get_players(&self, player_ids: &[PlayerId]) -> Result<Vec<Player>> {
        let players = self
            .players
            .read()
            .map_err(|_| lock_poisoned("players read"))?;

        Ok(player_ids
            .iter()
            .filter_map(|id| players.get(id).cloned())
            .collect())
    }

    fn list_players(&self) -> Result<Vec<Player>> {
        let players = self
            .players
            .read()
            .map_err(|_| lock_poisoned("players read"))?;

        let mut all: Vec<Player> = players.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(all)
    }

    fn update_player(
        &self,
        player_id: PlayerId,
        mutate: &mut dyn FnMut(&mut Player),
    ) -> Result<Player> {
        let mut players = self
            .players
            .write()
            .map_err(|_| lock_poisoned("players write"))?;

        let player = players
            .get_mut(&player_id)
            .ok_or_else(|| AppError::PlayerNotFound {
                player_id: player_id.to_string(),
            })?;

        mutate(player);
        Ok(player.clone())
    }
}

/// In-memory match storage
#[derive(Debug, Default)]
pub struct InMemoryMatchStore {
    matches: RwLock<HashMap<MatchId, Match>>,
}

impl InMemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MatchStore for InMemoryMatchStore {
    fn create_match(&self, m: Match) -> Result<Match> {
        let mut matches = self
            .matches
            .write()
            .map_err(|_| lock_poisoned("matches write"))?;

        matches.insert(m.id, m.clone());
        Ok(m)
    }

    fn get_match(&self, match_id: MatchId) -> Result<Option<Match>> {
        let matches = self
            .matches
            .read()
            .map_err(|_| lock_poisoned("matches read"))?;

        Ok(matches.get(&match_id).cloned())
    }

    fn list_joinable(&self, now: DateTime<Utc>) -> Result<Vec<Match>> {
        let matches = self
            .matches
            .read()
            .map_err(|_| lock_poisoned("matches read"))?;

        let mut joinable: Vec<Match> = matches
            .values()
            .filter(|m| m.scheduled_at > now && m.roster.len() < m.players_needed)
            .cloned()
            .collect();
        joinable.sort_by(|a, b| a.scheduled_at.cmp(&b.scheduled_at));
        Ok(joinable)
    }

    fn list_past_for_player(
        &self,
        player_id: PlayerId,
        now: DateTime<Utc>,
    ) -> Result<Vec<Match>> {
        let matches = self
            .matches
            .read()
            .map_err(|_| lock_poisoned("matches read"))?;

        let mut past: Vec<Match> = matches
            .values()
            .filter(|m| m.scheduled_at <= now && m.is_enrolled(player_id))
            .cloned()
            .collect();
        past.sort_by(|a, b| b.scheduled_at.cmp(&a.scheduled_at));
        Ok(past)
    }

    fn update_match(
        &self,
        match_id: MatchId,
        mutate: &mut dyn FnMut(&mut Match) -> Result<()>,
    ) -> Result<Match> {
        let mut matches = self
            .matches
            .write()
            .map_err(|_| lock_poisoned("matches write"))?;

        let stored = matches
            .get_mut(&match_id)
            .ok_or_else(|| AppError::MatchNotFound {
                match_id: match_id.to_string(),
            })?;

        // Mutate a copy so a rejected transition leaves the record
        // untouched.
        let mut candidate = stored.clone();
        mutate(&mut candidate)?;
        *stored = candidate.clone();
        Ok(candidate)
    }
}

/// In-memory rating storage keyed by the unique (rater, rated, match)
/// triple
#[derive(Debug, Default)]
pub struct InMemoryRatingStore {
    ratings: RwLock<HashMap<(PlayerId, PlayerId, MatchId), Rating>>,
    aggregated: RwLock<HashSet<(PlayerId, MatchId)>>,
}

impl InMemoryRatingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RatingStore for InMemoryRatingStore {
    fn insert_rating(&self, rating: Rating) -> Result<()> {
        let mut ratings = self
            .ratings
            .write()
            .map_err(|_| lock_poisoned("ratings write"))?;

        let key = (rating.rater_id, rating.rated_id, rating.match_id);
        if ratings.contains_key(&key) {
            return Err(AppError::DuplicateRating {
                rater_id: rating.rater_id.to_string(),
                rated_id: rating.rated_id.to_string(),
            }
            .into());
        }

        ratings.insert(key, rating);
        Ok(())
    }

    fn ratings_for(&self, rated_id: PlayerId, match_id: MatchId) -> Result<Vec<Rating>> {
        let ratings = self
            .ratings
            .read()
            .map_err(|_| lock_poisoned("ratings read"))?;

        let mut received: Vec<Rating> = ratings
            .values()
            .filter(|r| r.rated_id == rated_id && r.match_id == match_id)
            .cloned()
            .collect();
        received.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at));
        Ok(received)
    }

    fn rated_ids_by(&self, rater_id: PlayerId, match_id: MatchId) -> Result<Vec<PlayerId>> {
        let ratings = self
            .ratings
            .read()
            .map_err(|_| lock_poisoned("ratings read"))?;

        let mut given: Vec<&Rating> = ratings
            .values()
            .filter(|r| r.rater_id == rater_id && r.match_id == match_id)
            .collect();
        given.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at));
        Ok(given.into_iter().map(|r| r.rated_id).collect())
    }

    fn count_given_by(&self, rater_id: PlayerId, match_id: MatchId) -> Result<usize> {
        let ratings = self
            .ratings
            .read()
            .map_err(|_| lock_poisoned("ratings read"))?;

        Ok(ratings
            .values()
            .filter(|r| r.rater_id == rater_id && r.match_id == match_id)
            .count())
    }

    fn try_mark_aggregated(&self, rated_id: PlayerId, match_id: MatchId) -> Result<bool> {
        let mut aggregated = self
            .aggregated
            .write()
            .map_err(|_| lock_poisoned("aggregations write"))?;

        // HashSet::insert is the claim: false means someone already won.
        Ok(aggregated.insert((rated_id, match_id)))
    }
}
