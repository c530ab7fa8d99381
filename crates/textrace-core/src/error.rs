//! # Error Types
//!
//! Structured error hierarchy for textrace. All errors use `thiserror` for
//! derive-based `Display` and `Error` implementations.

use thiserror::Error;

/// Top-level error type for textrace.
#[derive(Error, Debug)]
pub enum TextraceError {
    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// A domain value failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed during canonicalization.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Errors raised when constructing validated domain primitives.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Batch identifier is empty, too long, or contains disallowed characters.
    #[error("invalid batch id: {0:?} (expected 1-64 characters of [A-Za-z0-9_-])")]
    InvalidBatchId(String),

    /// Owner, handler, location or variety text is empty or too long.
    #[error("invalid {field}: {reason}")]
    InvalidPartyName {
        /// Which field was rejected.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// Stage name is not one of the known processing stages.
    #[error("unknown stage: {0:?}")]
    UnknownStage(String),

    /// Not a 64-character hex SHA-256 digest.
    #[error("invalid SHA-256 digest: {0:?} (expected 64 hex characters)")]
    InvalidDigest(String),

    /// Timestamp is not a UTC RFC 3339 string.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
