//! Main application configuration
//!
//! This module defines the primary configuration structures for the fulbito
//! match-organizing service, including environment variable loading,
//! TOML file loading and validation.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub service: ServiceSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub rating: RatingSettings,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSettings {
    /// Service name for logging and metrics
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Host to bind the HTTP server to
    pub host: String,
    /// Port for the HTTP server
    pub http_port: u16,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,
}

/// Authentication settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    /// Bcrypt cost factor for password hashing
    pub bcrypt_cost: u32,
    /// Name of the session cookie
    pub session_cookie: String,
}

/// Skill rating settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingSettings {
    /// Lowest accepted value for a submitted skill score
    pub min_score: f64,
    /// Highest accepted value for a submitted skill score
    pub max_score: f64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "fulbito".to_string(),
            log_level: "info".to_string(),
            host: "0.0.0.0".to_string(),
            http_port: 8080,
            shutdown_timeout_seconds: 30,
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            bcrypt_cost: bcrypt::DEFAULT_COST,
            session_cookie: "fulbito_session".to_string(),
        }
    }
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            min_score: 0.0,
            max_score: 10.0,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            config.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            config.service.log_level = log_level;
        }
        if let Ok(host) = env::var("HTTP_HOST") {
            config.service.host = host;
        }
        if let Ok(port) = env::var("HTTP_PORT") {
            config.service.http_port = port
                .parse()
                .map_err(|_| anyhow!("Invalid HTTP_PORT value: {}", port))?;
        }
        if let Ok(timeout) = env::var("SHUTDOWN_TIMEOUT_SECONDS") {
            config.service.shutdown_timeout_seconds = timeout
                .parse()
                .map_err(|_| anyhow!("Invalid SHUTDOWN_TIMEOUT_SECONDS value: {}", timeout))?;
        }

        // Auth settings
        if let Ok(cost) = env::var("BCRYPT_COST") {
            config.auth.bcrypt_cost = cost
                .parse()
                .map_err(|_| anyhow!("Invalid BCRYPT_COST value: {}", cost))?;
        }
        if let Ok(cookie) = env::var("SESSION_COOKIE") {
            config.auth.session_cookie = cookie;
        }

        // Rating settings
        if let Ok(min) = env::var("MIN_SKILL_SCORE") {
            config.rating.min_score = min
                .parse()
                .map_err(|_| anyhow!("Invalid MIN_SKILL_SCORE value: {}", min))?;
        }
        if let Ok(max) = env::var("MAX_SKILL_SCORE") {
            config.rating.max_score = max
                .parse()
                .map_err(|_| anyhow!("Invalid MAX_SKILL_SCORE value: {}", max))?;
        }

        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        validate_config(&config)?;
        Ok(config)
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.service.shutdown_timeout_seconds)
    }

    /// Socket address string for the HTTP server
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.service.host, self.service.http_port)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    // Validate ports and timeouts
    if config.service.http_port == 0 {
        return Err(anyhow!("HTTP port cannot be 0"));
    }
    if config.service.shutdown_timeout_seconds == 0 {
        return Err(anyhow!("Shutdown timeout must be greater than 0"));
    }

    // Validate auth settings
    if config.auth.bcrypt_cost < 4 || config.auth.bcrypt_cost > 31 {
        return Err(anyhow!(
            "Bcrypt cost must be between 4 and 31, got {}",
            config.auth.bcrypt_cost
        ));
    }
    if config.auth.session_cookie.is_empty() {
        return Err(anyhow!("Session cookie name cannot be empty"));
    }

    // Validate rating bounds
    if config.rating.min_score >= config.rating.max_score {
        return Err(anyhow!(
            "Skill score bounds are inverted: min {} >= max {}",
            config.rating.min_score,
            config.rating.max_score
        ));
    }

    Ok(())
}
