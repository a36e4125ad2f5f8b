//! Cookie-backed session tracking
//!
//! Sessions map an opaque uuid token (carried in a cookie) to the
//! logged-in player's id. Tokens live until logout; there is no
//! expiry in scope.

use crate::error::{AppError, Result};
use crate::types::PlayerId;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// In-memory session registry
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, PlayerId>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session for a player and return its token
    pub fn create_session(&self, player_id: PlayerId) -> Result<Uuid> {
        let mut sessions = self.sessions.write().map_err(|_| AppError::InternalError {
            message: "Failed to acquire sessions write lock".to_string(),
        })?;

        let token = Uuid::new_v4();
        sessions.insert(token, player_id);
        Ok(token)
    }

    /// Resolve a token to the player it belongs to
    pub fn resolve(&self, token: Uuid) -> Result<Option<PlayerId>> {
        let sessions = self.sessions.read().map_err(|_| AppError::InternalError {
            message: "Failed to acquire sessions read lock".to_string(),
        })?;

        Ok(sessions.get(&token).copied())
    }

    /// Drop a session; returns whether a session existed
    pub fn revoke(&self, token: Uuid) -> Result<bool> {
        let mut sessions = self.sessions.write().map_err(|_| AppError::InternalError {
            message: "Failed to acquire sessions write lock".to_string(),
        })?;

        Ok(sessions.remove(&token).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_lifecycle() {
        let store = SessionStore::new();
        let player_id = Uuid::new_v4();

        let token = store.create_session(player_id).unwrap();
        assert_eq!(store.resolve(token).unwrap(), Some(player_id));

        assert!(store.revoke(token).unwrap());
        assert_eq!(store.resolve(token).unwrap(), None);
        assert!(!store.revoke(token).unwrap());
    }

    #[test]
    fn test_unknown_token_resolves_to_none() {
        let store = SessionStore::new();
        assert_eq!(store.resolve(Uuid::new_v4()).unwrap(), None);
    }
}
