//! Error handling for the estimator client

use thiserror::Error;

/// Failures setting the client up; request-time failures live in the
/// submission state instead
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] config::ConfigError),

    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;
