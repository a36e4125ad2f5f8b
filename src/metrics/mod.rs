//! Metrics and monitoring for the match-organizing service

pub mod collector;

pub use collector::{MatchMetrics, MetricsCollector, PlayerMetrics, RatingMetrics};
