//! Prediction HTTP handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::error::AppError;
use crate::models::PredictPayload;
use crate::services::PredictionService;
use crate::AppState;

/// Predict the harvest size distribution for fruit in a diameter range
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictPayload>, JsonRejection>,
) -> impl IntoResponse {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return AppError::Validation(rejection.body_text()).into_response(),
    };

    let request = match payload.into_request() {
        Ok(request) => request,
        Err(e) => return e.into_response(),
    };

    let service = PredictionService::new(state.db.clone());

    match service.predict(&request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => e.into_response(),
    }
}
