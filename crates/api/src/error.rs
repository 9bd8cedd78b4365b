use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use nanodash_core::error::CoreError;

use crate::automation::AutomationError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `nanodash_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A filesystem error while touching the outputs directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The upload back end reported a failure.
    #[error("Upload automation failed: {0}")]
    Automation(#[from] AutomationError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { .. } => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", core.to_string())
                }
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::AlreadyDeleted(_) => {
                    (StatusCode::CONFLICT, "ALREADY_DELETED", core.to_string())
                }
                // Configuration errors are surfaced verbatim so the user can
                // fix the secret file without digging through server logs.
                CoreError::MissingCredential(msg) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIG_ERROR",
                    msg.clone(),
                ),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Filesystem errors ---
            AppError::Io(err) => {
                tracing::error!(error = %err, "Filesystem error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),

            // --- Upstream automation failures ---
            AppError::Automation(err) => (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_FAILED",
                err.to_string(),
            ),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
