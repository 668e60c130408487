//! Prediction service transport
//!
//! `PredictionTransport` is the seam between the submission controller and
//! the network. `HttpTransport` is the reqwest implementation used in
//! production; tests substitute scripted transports.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use shared::{PredictionRequest, TransportError};

use crate::config::ClientConfig;
use crate::error::ClientResult;

/// Performs one prediction call and hands back the raw response body
#[async_trait]
pub trait PredictionTransport: Send + Sync {
    async fn predict(&self, request: &PredictionRequest) -> Result<Vec<u8>, TransportError>;
}

/// HTTP client for `POST /predict`
#[derive(Clone)]
pub struct HttpTransport {
    predict_url: String,
    http_client: Client,
}

impl HttpTransport {
    /// Create a transport posting to `predict_url`
    pub fn new(predict_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            predict_url: predict_url.into(),
            http_client,
        })
    }

    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Self::new(
            config.predict_url(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }
}

#[async_trait]
impl PredictionTransport for HttpTransport {
    async fn predict(&self, request: &PredictionRequest) -> Result<Vec<u8>, TransportError> {
        let response = self
            .http_client
            .post(&self.predict_url)
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::NetworkFailure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Prediction service returned {}", status);
            return Err(TransportError::NonSuccessStatus {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::NetworkFailure(e.to_string()))?;

        Ok(body.to_vec())
    }
}
