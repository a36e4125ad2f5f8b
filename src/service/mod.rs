//! HTTP service wiring and request handlers

pub mod app;
pub mod routes;

pub use app::AppState;
