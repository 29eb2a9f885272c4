//! # Control Surface Handlers
//!
//! Thin wrappers over the coordinator. All domain decisions live in
//! `orchestration::batch_coordinator`; these translate outcomes to HTTP.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::web::errors::ApiError;
use crate::web::state::AppState;

#[derive(Serialize)]
pub struct MessageResponse {
    message: String,
}

#[derive(Serialize)]
pub struct StatResponse {
    stat: i64,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
}

/// PUT /process/start
pub async fn start_process(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    info!("starting process");
    state.coordinator.start().await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse {
            message: "process started".to_string(),
        }),
    ))
}

/// PUT /process/pause
pub async fn pause_process(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    info!("pausing process");
    state.coordinator.pause().await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse {
            message: "process paused".to_string(),
        }),
    ))
}

/// GET /process/stat
pub async fn process_stat(
    State(state): State<AppState>,
) -> Result<Json<StatResponse>, ApiError> {
    let stat = state.coordinator.get_latest_stat().await?;
    Ok(Json(StatResponse { stat }))
}

/// GET /health
pub async fn health(State(_state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
