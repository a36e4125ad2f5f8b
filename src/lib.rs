//! Fulbito - Pickup football match organizing service
//!
//! This crate provides player registration, match scheduling with
//! capacity-bounded rosters, post-match peer skill ratings and
//! average-based team balancing behind an HTTP API.

pub mod auth;
pub mod config;
pub mod error;
pub mod metrics;
pub mod rating;
pub mod roster;
pub mod service;
pub mod storage;
pub mod team;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{AppError, Result};
pub use types::*;

// Re-export key components
pub use service::AppState;
pub use storage::{MatchStore, PlayerStore, RatingStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
