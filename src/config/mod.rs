//! Configuration management for the match-organizing service

pub mod app;

pub use app::{validate_config, AppConfig, AuthSettings, RatingSettings, ServiceSettings};
