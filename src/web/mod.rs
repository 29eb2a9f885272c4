//! # Web Control Surface
//!
//! Axum router exposing the coordinator's lifecycle operations as
//! request/response endpoints:
//!
//! - `PUT /process/start` — 202 on success, 429 if a process is running
//! - `PUT /process/pause` — 202 on success, 412 if nothing to pause
//! - `GET /process/stat`  — 200 with the latest claim count, 412 if no process
//! - `GET /health`        — liveness probe
//!
//! Control-flow signals map to specific, stable status codes so polling
//! clients can tell "nothing to do yet" from "system is broken".

pub mod errors;
pub mod handlers;
pub mod state;

pub use errors::ApiError;
pub use state::AppState;

use axum::routing::{get, put};
use axum::Router;

/// Build the control-surface router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/process/start", put(handlers::start_process))
        .route("/process/pause", put(handlers::pause_process))
        .route("/process/stat", get(handlers::process_stat))
        .route("/health", get(handlers::health))
        .with_state(state)
}
