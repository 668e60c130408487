//! Configuration for the estimator client
//!
//! Loaded in layers:
//! 1. Default values in code
//! 2. Configuration files (config/client-development.toml, ...)
//! 3. Environment variable overrides with ORCHARD_CLIENT_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Client configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ClientConfig {
    /// Current environment (development, production)
    pub environment: String,

    /// Base URL of the prediction service
    pub endpoint: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl ClientConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("ORCHARD_CLIENT_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            .set_default("environment", environment.clone())?
            .set_default("endpoint", "http://127.0.0.1:8080")?
            .set_default("request_timeout_secs", 30)?
            .add_source(File::with_name(&format!("config/client-{}", environment)).required(false))
            .add_source(
                Environment::with_prefix("ORCHARD_CLIENT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Full URL of the prediction route
    pub fn predict_url(&self) -> String {
        format!("{}/predict", self.endpoint.trim_end_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            endpoint: "http://127.0.0.1:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}
