//! # Bearer Token Authentication
//!
//! Batch mutations, the batch listing and the OpenAPI document require
//! `Authorization: Bearer <token>` when `AUTH_TOKEN` is configured.
//! Ledger reads, single-batch lookups, the batch summary and health checks
//! are always public.
//!
//! With no token configured every request passes (development mode).

use axum::extract::Request;
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use subtle::ConstantTimeEq;

use crate::error::AppError;

/// Auth configuration injected into request extensions.
///
/// `Debug` redacts the token.
#[derive(Clone, Default)]
pub struct AuthConfig {
    pub token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Constant-time token comparison. A length mismatch still performs one
/// comparison so the early return costs the same.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Check the caller's bearer token against the configured one.
pub fn check_bearer(header_value: Option<&str>, expected: &str) -> Result<(), AppError> {
    let value = header_value
        .ok_or_else(|| AppError::Unauthorized("missing authorization header".into()))?;
    let provided = value.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthorized("authorization header must use Bearer scheme".into())
    })?;
    if constant_time_token_eq(provided.trim(), expected) {
        Ok(())
    } else {
        Err(AppError::Unauthorized("invalid bearer token".into()))
    }
}

/// Reject requests without a valid bearer token.
pub async fn auth_middleware(request: Request, next: Next) -> Response {
    let expected = request
        .extensions()
        .get::<AuthConfig>()
        .and_then(|c| c.token.clone());

    if let Some(expected) = expected {
        let header_value = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        if let Err(err) = check_bearer(header_value, &expected) {
            tracing::warn!(reason = %err, path = %request.uri().path(), "authentication failed");
            return err.into_response();
        }
    }

    next.run(request).await
}
