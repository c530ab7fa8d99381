//! # Request Extraction & Validation
//!
//! Request DTOs arrive as plain strings and are converted into validated
//! domain inputs through [`Validate`]. Malformed JSON is a 400; a body
//! that parses but carries an invalid field is a 422.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::AppError;

/// A request body that can be turned into a validated domain input.
pub trait Validate {
    type Validated;

    fn validate(self) -> Result<Self::Validated, AppError>;
}

/// Extract a JSON body, mapping rejections to [`AppError::BadRequest`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a JSON body and validate it.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T::Validated, AppError> {
    extract_json(result)?.validate()
}
