//! Configuration management for the prediction service
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with ORCHARD_ prefix

use std::time::Duration;

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Database host name or IP
    pub host: Option<String>,

    /// Cloud SQL instance; when set the service connects through
    /// the unix socket under /cloudsql instead of `host`
    pub instance_connection_name: Option<String>,

    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Seconds to wait for a connection before failing a request
    pub connect_timeout_secs: u64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("ORCHARD_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8080)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.port", 5432)?
            .set_default("database.name", "fruit-db")?
            .set_default("database.user", "postgres")?
            .set_default("database.password", "")?
            .set_default("database.max_connections", 5)?
            .set_default("database.connect_timeout_secs", 5)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (ORCHARD prefix)
            .add_source(
                Environment::with_prefix("ORCHARD")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl DatabaseConfig {
    /// Connection options for the fruit database.
    ///
    /// Fails when neither a host nor a Cloud SQL instance is configured.
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        let options = PgConnectOptions::new()
            .port(self.port)
            .database(&self.name)
            .username(&self.user)
            .password(&self.password);

        if let Some(instance) = self.instance_connection_name.as_deref().filter(|s| !s.is_empty()) {
            tracing::info!("Connecting using Unix socket: /cloudsql/{}", instance);
            return Ok(options.socket(format!("/cloudsql/{}", instance)));
        }

        match self.host.as_deref().filter(|s| !s.is_empty()) {
            Some(host) => {
                tracing::info!("Connecting using host: {}", host);
                Ok(options.host(host))
            }
            None => Err(ConfigError::Message(
                "No database host or instance connection name provided".to_string(),
            )),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
        }
    }
}
