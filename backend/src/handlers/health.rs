//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub environment: String,
    pub database: &'static str,
    /// Scanned fruit available for prediction, when the database answers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scanned_fruits: Option<i64>,
}

/// Reports service status and whether the fruit table is reachable
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let scanned_fruits = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM fruits")
        .fetch_one(&state.db)
        .await
        .map_err(|e| tracing::warn!("Health check could not reach database: {}", e))
        .ok();

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        database: if scanned_fruits.is_some() { "connected" } else { "disconnected" },
        scanned_fruits,
    })
}
