//! Submission controller
//!
//! Owns the screen state and is its only writer. At most one prediction
//! request is outstanding: a submit that arrives while the screen is busy
//! is ignored, and a request in flight always runs to completion. If the
//! caller drops a submission before it resolves, the screen ends in a
//! failed state so the next submit is accepted.

use shared::{validate, FormInput, PredictionRequest, ScreenState, SubmissionState, TransportError};
use tokio::sync::watch;

use crate::transport::PredictionTransport;

pub struct SubmissionController<T> {
    transport: T,
    state: watch::Sender<ScreenState>,
}

impl<T: PredictionTransport> SubmissionController<T> {
    pub fn new(transport: T) -> Self {
        let (state, _) = watch::channel(ScreenState::default());
        Self { transport, state }
    }

    /// Snapshot of what the screen should show
    pub fn state(&self) -> ScreenState {
        self.state.borrow().clone()
    }

    /// Read-only view that is notified on every transition
    pub fn subscribe(&self) -> watch::Receiver<ScreenState> {
        self.state.subscribe()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send an already validated request.
    ///
    /// Clears any result on display, waits for the service and returns the
    /// terminal state. While another request is in flight this is a no-op
    /// that returns the current state.
    pub async fn submit(&self, request: PredictionRequest) -> SubmissionState {
        let claimed = self.state.send_if_modified(|screen| {
            if screen.is_busy() {
                return false;
            }
            *screen = std::mem::take(screen).dispatch();
            true
        });

        if !claimed {
            tracing::debug!("Submission ignored: a prediction request is already in flight");
            return self.state.borrow().submission.clone();
        }

        self.send(request).await
    }

    /// Validate the form and, if it passes, submit it.
    ///
    /// A validation failure leaves the previous result on screen and only
    /// adds a message.
    pub async fn submit_form(&self, input: &FormInput) -> ScreenState {
        let mut previous = None;
        self.state.send_if_modified(|screen| {
            previous = screen.begin_validation();
            previous.is_some()
        });

        let Some(previous) = previous else {
            tracing::debug!("Form submission ignored: a prediction request is already in flight");
            return self.state();
        };

        match validate(input) {
            Ok(request) => {
                self.state
                    .send_modify(|screen| *screen = std::mem::take(screen).dispatch());
                let submission = self.send(request).await;
                ScreenState {
                    submission,
                    validation_error: None,
                }
            }
            Err(error) => {
                tracing::warn!("Form rejected: {}", error);
                let mut rejected = ScreenState::default();
                self.state.send_modify(|screen| {
                    *screen = std::mem::take(screen).reject(previous, error);
                    rejected = screen.clone();
                });
                rejected
            }
        }
    }

    async fn send(&self, request: PredictionRequest) -> SubmissionState {
        tracing::info!(
            scan_date = %request.scan_date,
            harvest_date = %request.harvest_date,
            growth_rate = request.growth_rate,
            min_diameter = request.min_diameter,
            max_diameter = request.max_diameter,
            "Requesting harvest width prediction"
        );

        let mut guard = InFlightGuard {
            state: &self.state,
            armed: true,
        };
        let outcome = self.transport.predict(&request).await;
        guard.armed = false;
        if let Err(e) = &outcome {
            tracing::error!("Prediction request failed: {}", e);
        }

        let mut finished = SubmissionState::Idle;
        self.state.send_modify(|screen| {
            *screen = std::mem::take(screen).resolve(outcome);
            finished = screen.submission.clone();
        });

        if let Some(average) = finished.average_diameter() {
            tracing::info!("Predicted average diameter: {} mm", shared::format_average(average));
        }
        finished
    }
}

/// Resolves an abandoned in-flight submission as cancelled
struct InFlightGuard<'a> {
    state: &'a watch::Sender<ScreenState>,
    armed: bool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        tracing::warn!("Prediction request dropped before the service answered");
        self.state.send_modify(|screen| {
            *screen = std::mem::take(screen).resolve(Err(TransportError::Cancelled));
        });
    }
}
