//! Metrics collection using Prometheus
//!
//! Counters for the request-facing operations plus a gauge for the
//! number of currently joinable matches, exported through the
//! `/metrics` endpoint.

use anyhow::Result;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;

/// Main metrics collector for the service
#[derive(Clone)]
pub struct MetricsCollector {
    registry: Arc<Registry>,
    player_metrics: PlayerMetrics,
    match_metrics: MatchMetrics,
    rating_metrics: RatingMetrics,
}

/// Player-related metrics
#[derive(Clone)]
pub struct PlayerMetrics {
    /// Total players registered
    pub registered_total: IntCounter,

    /// Login attempts by outcome (success, failure)
    pub logins_total: IntCounterVec,
}

/// Match-related metrics
#[derive(Clone)]
pub struct MatchMetrics {
    /// Total matches created
    pub created_total: IntCounter,

    /// Signup attempts by outcome (accepted, rejected)
    pub signups_total: IntCounterVec,

    /// Withdrawal attempts by outcome
    pub withdrawals_total: IntCounterVec,

    /// Matches currently open for signup
    pub open_matches: IntGauge,
}

/// Rating-related metrics
#[derive(Clone)]
pub struct RatingMetrics {
    /// Ratings accepted and stored
    pub submitted_total: IntCounter,

    /// Ratings rejected, labeled by reason
    pub rejected_total: IntCounterVec,

    /// Match-level aggregations applied to player stats
    pub aggregations_total: IntCounter,

    /// Time spent reducing and applying a match's ratings
    pub aggregation_duration: Histogram,
}

impl PlayerMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let registered_total = IntCounter::with_opts(Opts::new(
            "fulbito_players_registered_total",
            "Total players registered",
        ))?;
        let logins_total = IntCounterVec::new(
            Opts::new("fulbito_logins_total", "Login attempts by outcome"),
            &["outcome"],
        )?;

        registry.register(Box::new(registered_total.clone()))?;
        registry.register(Box::new(logins_total.clone()))?;

        Ok(Self {
            registered_total,
            logins_total,
        })
    }
}

impl MatchMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let created_total = IntCounter::with_opts(Opts::new(
            "fulbito_matches_created_total",
            "Total matches created",
        ))?;
        let signups_total = IntCounterVec::new(
            Opts::new("fulbito_signups_total", "Signup attempts by outcome"),
            &["outcome"],
        )?;
        let withdrawals_total = IntCounterVec::new(
            Opts::new(
                "fulbito_withdrawals_total",
                "Withdrawal attempts by outcome",
            ),
            &["outcome"],
        )?;
        let open_matches = IntGauge::with_opts(Opts::new(
            "fulbito_open_matches",
            "Matches currently open for signup",
        ))?;

        registry.register(Box::new(created_total.clone()))?;
        registry.register(Box::new(signups_total.clone()))?;
        registry.register(Box::new(withdrawals_total.clone()))?;
        registry.register(Box::new(open_matches.clone()))?;

        Ok(Self {
            created_total,
            signups_total,
            withdrawals_total,
            open_matches,
        })
    }
}

impl RatingMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let submitted_total = IntCounter::with_opts(Opts::new(
            "fulbito_ratings_submitted_total",
            "Ratings accepted and stored",
        ))?;
        let rejected_total = IntCounterVec::new(
            Opts::new(
                "fulbito_ratings_rejected_total",
                "Ratings rejected by reason",
            ),
            &["reason"],
        )?;
        let aggregations_total = IntCounter::with_opts(Opts::new(
            "fulbito_rating_aggregations_total",
            "Match-level aggregations applied to player stats",
        ))?;
        let aggregation_duration = Histogram::with_opts(HistogramOpts::new(
            "fulbito_rating_aggregation_duration_seconds",
            "Time spent reducing and applying a match's ratings",
        ))?;

        registry.register(Box::new(submitted_total.clone()))?;
        registry.register(Box::new(rejected_total.clone()))?;
        registry.register(Box::new(aggregations_total.clone()))?;
        registry.register(Box::new(aggregation_duration.clone()))?;

        Ok(Self {
            submitted_total,
            rejected_total,
            aggregations_total,
            aggregation_duration,
        })
    }
}

impl MetricsCollector {
    /// Create a new metrics collector with its own registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with a custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let player_metrics = PlayerMetrics::new(&registry)?;
        let match_metrics = MatchMetrics::new(&registry)?;
        let rating_metrics = RatingMetrics::new(&registry)?;

        Ok(Self {
            registry,
            player_metrics,
            match_metrics,
            rating_metrics,
        })
    }

    pub fn players(&self) -> &PlayerMetrics {
        &self.player_metrics
    }

    pub fn matches(&self) -> &MatchMetrics {
        &self.match_metrics
    }

    pub fn ratings(&self) -> &RatingMetrics {
        &self.rating_metrics
    }

    /// Render all registered metrics in the Prometheus text format
    pub fn gather(&self) -> Result<String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
