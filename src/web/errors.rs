//! # Web API Error Types
//!
//! HTTP-facing errors and their status-code mappings. Leverages thiserror for
//! the enum and axum's `IntoResponse` for conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::error::ProcessorError;

/// Control-surface errors with stable HTTP status mappings.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A running process already exists; the client may retry later.
    #[error("running process exists")]
    RunningProcessConflict,

    /// The operation's precondition does not hold (no process, or the latest
    /// one is not in the required status).
    #[error("precondition failed: {message}")]
    PreconditionFailed { message: String },

    #[error("internal server error")]
    Internal,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::RunningProcessConflict => StatusCode::TOO_MANY_REQUESTS,
            ApiError::PreconditionFailed { .. } => StatusCode::PRECONDITION_FAILED,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ProcessorError> for ApiError {
    fn from(err: ProcessorError) -> Self {
        match &err {
            ProcessorError::RunningProcessExists => ApiError::RunningProcessConflict,
            ProcessorError::NoProcessExists => ApiError::PreconditionFailed {
                message: "no processes exist".to_string(),
            },
            ProcessorError::NoRunningProcessExists => ApiError::PreconditionFailed {
                message: "no applicable processes exist".to_string(),
            },
            ProcessorError::MultipleRunningProcesses(_)
            | ProcessorError::Database(_)
            | ProcessorError::Configuration(_) => {
                tracing::error!(error = %err, "control surface request failed");
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::RunningProcessConflict => "running process exists".to_string(),
            ApiError::PreconditionFailed { message } => message.clone(),
            ApiError::Internal => "internal server error".to_string(),
        };

        (self.status_code(), Json(json!({ "message": message }))).into_response()
    }
}
