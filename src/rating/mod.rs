//! Rating aggregation for the match-organizing service
//!
//! Players carry rolling per-skill averages instead of rating history;
//! this module folds newly submitted skill vectors into those averages.

pub mod aggregator;

pub use aggregator::{apply_skill_rating, average_ratings};
