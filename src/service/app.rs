//! Main application state and HTTP serving
//!
//! This module contains the dependency-injected service context passed
//! to every request handler, replacing any notion of global shared
//! application state. Components are constructed once here and shared
//! behind Arcs.

use crate::auth::{BcryptHasher, PasswordHasher, SessionStore};
use crate::config::AppConfig;
use crate::error::Result;
use crate::metrics::MetricsCollector;
use crate::service::routes;
use crate::storage::{
    InMemoryMatchStore, InMemoryPlayerStore, InMemoryRatingStore, MatchStore, PlayerStore,
    RatingStore,
};
use anyhow::Context;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Service context handed to request handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub players: Arc<dyn PlayerStore>,
    pub matches: Arc<dyn MatchStore>,
    pub ratings: Arc<dyn RatingStore>,
    pub sessions: Arc<SessionStore>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub metrics: Arc<MetricsCollector>,
}

impl AppState {
    /// Construct the production context with in-memory stores and bcrypt
    pub fn new(config: AppConfig) -> Result<Self> {
        let hasher = BcryptHasher::new(config.auth.bcrypt_cost);

        Ok(Self {
            config: Arc::new(config),
            players: Arc::new(InMemoryPlayerStore::new()),
            matches: Arc::new(InMemoryMatchStore::new()),
            ratings: Arc::new(InMemoryRatingStore::new()),
            sessions: Arc::new(SessionStore::new()),
            hasher: Arc::new(hasher),
            metrics: Arc::new(MetricsCollector::new()?),
        })
    }

    /// Construct a context from explicit components (used by tests to
    /// swap in fakes)
    pub fn with_components(
        config: AppConfig,
        players: Arc<dyn PlayerStore>,
        matches: Arc<dyn MatchStore>,
        ratings: Arc<dyn RatingStore>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Result<Self> {
        Ok(Self {
            config: Arc::new(config),
            players,
            matches,
            ratings,
            sessions: Arc::new(SessionStore::new()),
            hasher,
            metrics: Arc::new(MetricsCollector::new()?),
        })
    }

    /// Build the router over this context
    pub fn router(&self) -> axum::Router {
        routes::router(self.clone())
    }

    /// Bind the HTTP listener and serve until the shutdown future
    /// resolves
    pub async fn serve<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.http_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind HTTP listener on {}", addr))?;

        info!("HTTP server listening on http://{}", addr);

        let router = self.router();
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .context("HTTP server error")?;

        info!("HTTP server stopped");
        Ok(())
    }
}
