//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Domain errors from `textrace-core`, `textrace-ledger` and the batch
//! registry map to HTTP status codes and a JSON body of the form
//! `{"error": {"code", "message"}}`. Internal details are never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use textrace_ledger::LedgerError;
use thiserror::Error;
use utoipa::ToSchema;

use crate::registry::RegistryError;

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable code, e.g. `NOT_FOUND`.
    pub code: String,
    pub message: String,
}

/// Application-level error returned by every handler.
#[derive(Error, Debug)]
pub enum AppError {
    /// 404.
    #[error("not found: {0}")]
    NotFound(String),

    /// 422: the request parsed but a field is invalid.
    #[error("validation error: {0}")]
    Validation(String),

    /// 400: the body is not the expected JSON.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// 401: missing or wrong bearer token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// 409.
    #[error("conflict: {0}")]
    Conflict(String),

    /// 500. Logged, never shown to the client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => {
                tracing::error!(error = %self, "internal server error");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<textrace_core::ValidationError> for AppError {
    fn from(err: textrace_core::ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InvalidTransaction(msg) => Self::Validation(msg),
            LedgerError::Canonicalization(e) => Self::Internal(e.to_string()),
        }
    }
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(_) => Self::NotFound(err.to_string()),
            RegistryError::AlreadyExists(_) => Self::Conflict(err.to_string()),
            RegistryError::Ledger(e) => Self::from(e),
        }
    }
}
