//! Storage interfaces for players, matches and ratings
//!
//! The core never talks to a datastore directly: it receives and returns
//! plain records through these traits. Relationship loading is explicit
//! (query functions returning plain sequences); there is no lazy or
//! implicit I/O inside core logic.

pub mod memory;

pub use memory::{InMemoryMatchStore, InMemoryPlayerStore, InMemoryRatingStore};

use crate::error::Result;
use crate::types::{Match, MatchId, Player, PlayerId, Rating};
use chrono::{DateTime, Utc};

/// Trait for player persistence
pub trait PlayerStore: Send + Sync {
    /// Store a new player; rejects duplicate email or name
    fn create_player(&self, player: Player) -> Result<Player>;

    /// Get a player by id
    fn get_player(&self, player_id: PlayerId) -> Result<Option<Player>>;

    /// Look a player up by email (for login)
    fn find_by_email(&self, email: &str) -> Result<Option<Player>>;

    /// Get several players, in the order of the given ids; unknown ids
    /// are skipped
    fn get_players(&self, player_ids: &[PlayerId]) -> Result<Vec<Player>>;

    /// All registered players
    fn list_players(&self) -> Result<Vec<Player>>;

    /// Mutate one player record atomically under the store's write lock
    fn update_player(
        &self,
        player_id: PlayerId,
        mutate: &mut dyn FnMut(&mut Player),
    ) -> Result<Player>;
}

/// Trait for match persistence
pub trait MatchStore: Send + Sync {
    /// Store a new match
    fn create_match(&self, m: Match) -> Result<Match>;

    /// Get a match by id
    fn get_match(&self, match_id: MatchId) -> Result<Option<Match>>;

    /// Matches that are in the future and still have open spots
    fn list_joinable(&self, now: DateTime<Utc>) -> Result<Vec<Match>>;

    /// Past matches a given player was enrolled in
    fn list_past_for_player(&self, player_id: PlayerId, now: DateTime<Utc>)
        -> Result<Vec<Match>>;

    /// Mutate one match record atomically under the store's write lock.
    ///
    /// Roster mutations go through here so the capacity check and the
    /// append are one read-modify-write; concurrent signups cannot
    /// overbook the roster. If the closure fails, nothing is stored.
    fn update_match(
        &self,
        match_id: MatchId,
        mutate: &mut dyn FnMut(&mut Match) -> Result<()>,
    ) -> Result<Match>;
}

/// Trait for rating persistence
pub trait RatingStore: Send + Sync {
    /// Store one rating; enforces the unique (rater, rated, match)
    /// triple and surfaces violations as `AppError::DuplicateRating`
    fn insert_rating(&self, rating: Rating) -> Result<()>;

    /// All ratings one player received in one match
    fn ratings_for(&self, rated_id: PlayerId, match_id: MatchId) -> Result<Vec<Rating>>;

    /// Ids of the players a rater has already rated in one match
    fn rated_ids_by(&self, rater_id: PlayerId, match_id: MatchId) -> Result<Vec<PlayerId>>;

    /// How many ratings a rater has submitted for one match
    fn count_given_by(&self, rater_id: PlayerId, match_id: MatchId) -> Result<usize>;

    /// Atomically record that the (rated, match) aggregation has been
    /// applied; returns true only for the first caller.
    ///
    /// Two raters can submit the final two ratings of a match at the
    /// same time and both observe the complete set, so the stat update
    /// must be claimed through this marker before it is applied.
    fn try_mark_aggregated(&self, rated_id: PlayerId, match_id: MatchId) -> Result<bool>;
}
