use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

// ── Error codes ─────────────────────────────────────────────────────
//
// Stable, machine-readable identifiers. Clients match on these,
// never on the human-readable message string.

/// Stable error code constants.
///
/// Response bodies look like `{"code": "NOT_FOUND", "error": "..."}`.
pub mod error_code {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const INTERNAL: &str = "INTERNAL";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
}

/// Message sent to clients in place of any 5xx detail.
pub const GENERIC_SERVER_ERROR: &str = "Internal server error";

// ── ServiceError ────────────────────────────────────────────────────

/// HTTP-facing error shared by every module.
///
/// Each variant maps to a stable error code (see [`error_code`]) and an
/// HTTP status code. Storage and internal failures are logged with their
/// detail and answered with [`GENERIC_SERVER_ERROR`].
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Resource does not exist. HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// Input is malformed, missing, or references unknown ids. HTTP 400.
    #[error("{0}")]
    Validation(String),

    /// Storage backend failure. HTTP 500.
    #[error("{0}")]
    Storage(String),

    /// Unexpected internal error. HTTP 500.
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => error_code::NOT_FOUND,
            ServiceError::Validation(_) => error_code::VALIDATION_FAILED,
            ServiceError::Storage(_) => error_code::STORAGE_ERROR,
            ServiceError::Internal(_) => error_code::INTERNAL,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Storage(_) | ServiceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The message a client is allowed to see.
    pub fn public_message(&self) -> String {
        match self {
            ServiceError::Storage(_) | ServiceError::Internal(_) => {
                GENERIC_SERVER_ERROR.to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "request failed: {}", self);
        }
        let body = serde_json::json!({
            "code": self.error_code(),
            "error": self.public_message(),
        });
        (status, axum::Json(body)).into_response()
    }
}
