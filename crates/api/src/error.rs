use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use cre8_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `cre8_core` / `cre8_engine`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message (malformed multipart).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::NotReady { capability } => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "NOT_READY",
                    format!("Capability not ready: {capability}"),
                ),
                // Generation diagnostics are surfaced to aid debugging, per
                // the error-handling contract.
                CoreError::Generation { detail } => {
                    tracing::error!(error = %detail, "Generation failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "GENERATION_FAILED",
                        format!("Generation failed: {detail}"),
                    )
                }
                CoreError::ArtifactMissing { path } => {
                    tracing::error!(path = %path, "Artifact missing after generation");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "ARTIFACT_MISSING",
                        "Generation reported success but no output file was produced".to_string(),
                    )
                }
                CoreError::Spawn { detail } => {
                    tracing::error!(error = %detail, "Process spawn failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "SPAWN_FAILED",
                        format!("Failed to launch external process: {detail}"),
                    )
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
