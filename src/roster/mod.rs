//! Match roster lifecycle and rating preconditions

pub mod instance;

pub use instance::{match_not_found, RosterPhase};
