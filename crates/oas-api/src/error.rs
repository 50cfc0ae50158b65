//! # Application Error
//!
//! Maps pipeline and store errors to structured HTTP responses with proper
//! status codes and error bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use oas_pipeline::PipelineError;
use oas_registry::StoreError;

/// Application-level error type that maps to HTTP responses.
#[derive(Error, Debug)]
pub enum AppError {
    /// Requested artifact does not exist in the store.
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Caller-supplied digest disagrees with the uploaded content.
    #[error("integrity check failed: {0}")]
    Integrity(String),

    /// The remote store failed, or returned bytes this service refuses
    /// to serve.
    #[error("upstream store error: {0}")]
    Upstream(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Integrity(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = serde_json::json!({
            "error": {
                "code": status.as_u16(),
                "message": self.to_string(),
            }
        });
        (status, axum::Json(body)).into_response()
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::IntegrityMismatch { .. } => AppError::Integrity(err.to_string()),
            PipelineError::CorruptPayload { .. } => AppError::Upstream(err.to_string()),
            PipelineError::Store(StoreError::NotFound { repo, tag }) => {
                AppError::NotFound(format!("artifact {repo}:{tag}"))
            }
            PipelineError::Store(store_err) => AppError::Upstream(store_err.to_string()),
            // Local I/O details stay in the logs, not in the response.
            PipelineError::Io(e) => {
                tracing::error!(error = %e, "pipeline I/O failure");
                AppError::Internal("internal I/O error".to_string())
            }
        }
    }
}
