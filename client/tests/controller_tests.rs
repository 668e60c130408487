//! Submission controller tests
//!
//! Drive the controller with scripted transports covering:
//! - successful predictions with and without a usable histogram
//! - transport failures and what they clear
//! - the single-request-in-flight guard
//! - submissions dropped before the service answers

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

use async_trait::async_trait;
use orchard_estimator::{PredictionTransport, SubmissionController};
use serde_json::json;
use shared::{
    validate, Diameter, FormInput, PredictionRequest, SubmissionState, TransportError,
    ValidationError,
};
use tokio::sync::Notify;
use tokio::time::timeout;

/// Replies from a queue of canned outcomes and records every request
struct ScriptedTransport {
    replies: Mutex<Vec<Result<Vec<u8>, TransportError>>>,
    seen: Mutex<Vec<PredictionRequest>>,
}

impl ScriptedTransport {
    fn new(replies: Vec<Result<Vec<u8>, TransportError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().rev().collect()),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl PredictionTransport for ScriptedTransport {
    async fn predict(&self, request: &PredictionRequest) -> Result<Vec<u8>, TransportError> {
        self.seen.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Err(TransportError::NetworkFailure("no reply scripted".into())))
    }
}

/// Holds every call until released
struct GatedTransport {
    gate: Notify,
    calls: AtomicUsize,
    body: Vec<u8>,
}

#[async_trait]
impl PredictionTransport for GatedTransport {
    async fn predict(&self, _request: &PredictionRequest) -> Result<Vec<u8>, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        Ok(self.body.clone())
    }
}

fn two_bin_body() -> Vec<u8> {
    serde_json::to_vec(&json!({
        "average_diameter": 55.5,
        "histogram": [
            {"bin_start": 20, "count": 5},
            {"bin_start": 40, "count": 3}
        ]
    }))
    .unwrap()
}

fn valid_form() -> FormInput {
    FormInput {
        scan_date: "2024-05-01".to_string(),
        harvest_date: "2024-07-01".to_string(),
        growth_rate: "0.05".to_string(),
        min_diameter: Diameter::new(30).unwrap(),
        max_diameter: Diameter::new(90).unwrap(),
    }
}

fn server_error() -> TransportError {
    TransportError::NonSuccessStatus {
        status: 500,
        status_text: "Internal Server Error".to_string(),
    }
}

// ============================================================================
// Successful submissions
// ============================================================================

#[tokio::test]
async fn valid_form_yields_average_and_ordered_bins() {
    let controller =
        SubmissionController::new(ScriptedTransport::new(vec![Ok(two_bin_body())]));

    let screen = controller.submit_form(&valid_form()).await;

    let result = screen.submission.result().expect("chart data");
    assert_eq!(shared::format_average(result.average_diameter), "55.50");
    assert_eq!(result.bins.len(), 2);
    assert_eq!(result.bins[0].width_range, "20–40 mm");
    assert_eq!(result.bins[0].count, 5.0);
    assert_eq!(result.bins[1].width_range, "40–60 mm");
    assert_eq!(result.bins[1].count, 3.0);
    assert!(screen.error_message().is_none());
    assert_eq!(controller.state(), screen);
}

#[tokio::test]
async fn request_carries_validated_values() {
    let controller =
        SubmissionController::new(ScriptedTransport::new(vec![Ok(two_bin_body())]));

    controller.submit_form(&valid_form()).await;

    let seen = controller.transport().seen.lock().unwrap().clone();
    assert_eq!(seen, vec![validate(&valid_form()).unwrap()]);
}

#[tokio::test]
async fn invalid_histogram_shows_average_only() {
    let body = serde_json::to_vec(&json!({
        "average_diameter": 61.2,
        "histogram": [{"bin_start": 20, "count": "x"}]
    }))
    .unwrap();
    let controller = SubmissionController::new(ScriptedTransport::new(vec![Ok(body)]));

    let screen = controller.submit_form(&valid_form()).await;

    assert_eq!(
        screen.submission,
        SubmissionState::SucceededNoChart {
            average_diameter: 61.2
        }
    );
    assert!(screen.error_message().is_none());
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn server_error_replaces_previous_result() {
    let controller = SubmissionController::new(ScriptedTransport::new(vec![
        Ok(two_bin_body()),
        Err(server_error()),
    ]));

    controller.submit_form(&valid_form()).await;
    assert!(controller.state().submission.result().is_some());

    let screen = controller.submit_form(&valid_form()).await;

    assert!(screen.submission.result().is_none());
    assert!(screen.submission.average_diameter().is_none());
    let message = screen.error_message().unwrap();
    assert!(message.contains("Internal Server Error"));
    assert!(message.starts_with("Failed to connect to backend: "));
    assert!(!screen.is_busy());
}

#[tokio::test]
async fn malformed_body_fails_without_result() {
    let controller = SubmissionController::new(ScriptedTransport::new(vec![Ok(
        b"not json".to_vec(),
    )]));

    let state = controller
        .submit(validate(&valid_form()).unwrap())
        .await;

    match state {
        SubmissionState::Failed(message) => {
            assert!(message.starts_with("Malformed response from backend"))
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn validation_failure_keeps_previous_result_and_skips_transport() {
    let controller =
        SubmissionController::new(ScriptedTransport::new(vec![Ok(two_bin_body())]));
    controller.submit_form(&valid_form()).await;

    let mut bad = valid_form();
    bad.harvest_date = "2024-04-01".to_string();
    let screen = controller.submit_form(&bad).await;

    assert_eq!(screen.validation_error, Some(ValidationError::InvalidDateOrder));
    assert!(screen.submission.result().is_some());
    assert_eq!(controller.transport().calls(), 1);
    assert_eq!(controller.state(), screen);
}

#[tokio::test]
async fn next_valid_submission_clears_validation_message() {
    let controller = SubmissionController::new(ScriptedTransport::new(vec![Ok(two_bin_body())]));

    let screen = controller.submit_form(&FormInput::default()).await;
    assert_eq!(screen.validation_error, Some(ValidationError::MissingFields));
    assert_eq!(screen.submission, SubmissionState::Idle);

    let screen = controller.submit_form(&valid_form()).await;
    assert!(screen.validation_error.is_none());
    assert!(screen.submission.result().is_some());
}

// ============================================================================
// Concurrency guard
// ============================================================================

#[tokio::test]
async fn second_submit_while_in_flight_is_ignored() {
    let controller = Arc::new(SubmissionController::new(GatedTransport {
        gate: Notify::new(),
        calls: AtomicUsize::new(0),
        body: two_bin_body(),
    }));
    let request = validate(&valid_form()).unwrap();

    let first = controller.submit(request.clone());
    let second = async {
        // The first future has already been polled and is parked in the transport
        assert_eq!(controller.state().submission, SubmissionState::InFlight);

        let ignored = controller.submit(request.clone()).await;
        assert_eq!(ignored, SubmissionState::InFlight);

        let ignored_form = controller.submit_form(&valid_form()).await;
        assert_eq!(ignored_form.submission, SubmissionState::InFlight);
        assert!(ignored_form.validation_error.is_none());

        controller.transport().gate.notify_one();
    };

    let (finished, ()) = tokio::join!(first, second);

    assert_eq!(controller.transport().calls.load(Ordering::SeqCst), 1);
    assert!(finished.result().is_some());
    assert_eq!(controller.state().submission, finished);
}

#[tokio::test]
async fn dropped_submission_releases_the_screen() {
    let controller = SubmissionController::new(GatedTransport {
        gate: Notify::new(),
        calls: AtomicUsize::new(0),
        body: two_bin_body(),
    });
    let request = validate(&valid_form()).unwrap();

    let abandoned = timeout(Duration::from_millis(50), controller.submit(request.clone())).await;
    assert!(abandoned.is_err());

    let screen = controller.state();
    assert!(!screen.is_busy());
    assert_eq!(
        screen.error_message().as_deref(),
        Some("Prediction request was cancelled.")
    );

    // Stored permit lets the next call through the gate
    controller.transport().gate.notify_one();
    let finished = controller.submit(request).await;

    assert_eq!(controller.transport().calls.load(Ordering::SeqCst), 2);
    assert!(finished.result().is_some());
    assert!(controller.state().error_message().is_none());
}

#[tokio::test]
async fn subscribers_observe_in_flight_then_result() {
    let controller = SubmissionController::new(GatedTransport {
        gate: Notify::new(),
        calls: AtomicUsize::new(0),
        body: two_bin_body(),
    });
    let mut rx = controller.subscribe();
    let request = validate(&valid_form()).unwrap();

    let submit = controller.submit(request);
    let watch = async {
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().submission, SubmissionState::InFlight);
        controller.transport().gate.notify_one();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().submission.result().is_some());
    };

    tokio::join!(submit, watch);
}
