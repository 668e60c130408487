//! Submission lifecycle state machine
//!
//! `ScreenState` is the single value a form screen renders from. It only
//! changes through the transition functions below, which the submission
//! controller applies as the one writer.

use thiserror::Error;

use crate::histogram::normalize;
use crate::models::{PredictionResponse, PredictionResult};
use crate::validation::ValidationError;

/// Failures talking to the prediction service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Failed to connect to backend: {0}")]
    NetworkFailure(String),

    #[error("Failed to connect to backend: Server error: {status_text}")]
    NonSuccessStatus { status: u16, status_text: String },

    #[error("Malformed response from backend: {0}")]
    MalformedResponse(String),

    /// The submission was dropped before the service answered
    #[error("Prediction request was cancelled.")]
    Cancelled,
}

/// Lifecycle of one submission attempt
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    /// The form is being checked; nothing has been sent yet
    Validating,
    InFlight,
    Succeeded(PredictionResult),
    /// The service answered but its histogram was empty or unusable
    SucceededNoChart { average_diameter: f64 },
    Failed(String),
}

impl SubmissionState {
    /// True while a new submission must not start
    pub fn is_busy(&self) -> bool {
        matches!(self, SubmissionState::Validating | SubmissionState::InFlight)
    }

    pub fn average_diameter(&self) -> Option<f64> {
        match self {
            SubmissionState::Succeeded(result) => Some(result.average_diameter),
            SubmissionState::SucceededNoChart { average_diameter } => Some(*average_diameter),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        match self {
            SubmissionState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    /// Terminal state for a finished transport call
    pub fn from_outcome(outcome: Result<Vec<u8>, TransportError>) -> Self {
        match outcome.and_then(|body| interpret_response(&body)) {
            Ok(state) => state,
            Err(e) => SubmissionState::Failed(e.to_string()),
        }
    }
}

/// Decode a 2xx body and normalize its histogram
pub fn interpret_response(body: &[u8]) -> Result<SubmissionState, TransportError> {
    let response: PredictionResponse = serde_json::from_slice(body)
        .map_err(|e| TransportError::MalformedResponse(e.to_string()))?;

    if let Some(message) = &response.message {
        tracing::info!("Prediction service note: {}", message);
    }

    match normalize(&response.histogram) {
        Ok(bins) => Ok(SubmissionState::Succeeded(PredictionResult {
            average_diameter: response.average_diameter,
            bins,
        })),
        Err(e) => {
            tracing::warn!(
                bins = response.histogram.len(),
                "Invalid histogram data: {}",
                e
            );
            Ok(SubmissionState::SucceededNoChart {
                average_diameter: response.average_diameter,
            })
        }
    }
}

/// Everything the form screen shows besides the inputs themselves
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScreenState {
    pub submission: SubmissionState,
    pub validation_error: Option<ValidationError>,
}

impl ScreenState {
    pub fn is_busy(&self) -> bool {
        self.submission.is_busy()
    }

    /// Claim the screen for validating a new attempt.
    ///
    /// Returns the submission that was on display so it can be put back if
    /// validation fails, or None when a submission is already under way.
    pub fn begin_validation(&mut self) -> Option<SubmissionState> {
        if self.is_busy() {
            return None;
        }
        Some(std::mem::replace(
            &mut self.submission,
            SubmissionState::Validating,
        ))
    }

    /// Validation failed: restore what was shown and add the message
    pub fn reject(self, previous: SubmissionState, error: ValidationError) -> Self {
        Self {
            submission: previous,
            validation_error: Some(error),
        }
    }

    /// A validated request is about to be sent; prior results are cleared
    pub fn dispatch(self) -> Self {
        Self {
            submission: SubmissionState::InFlight,
            validation_error: None,
        }
    }

    pub fn resolve(self, outcome: Result<Vec<u8>, TransportError>) -> Self {
        Self {
            submission: SubmissionState::from_outcome(outcome),
            validation_error: None,
        }
    }

    /// The single message the screen should show, if any
    pub fn error_message(&self) -> Option<String> {
        if let Some(error) = &self.validation_error {
            return Some(error.to_string());
        }
        match &self.submission {
            SubmissionState::Failed(message) => Some(message.clone()),
            _ => None,
        }
    }
}
