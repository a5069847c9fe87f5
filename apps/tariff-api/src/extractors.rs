//! # Extractor Helpers
//!
//! Turn axum's extractor rejections into [`ApiError`]s so every failure,
//! including a malformed body, answers with the same JSON error shape.
//!
//! ```text
//! JsonRejection::JsonSyntaxError         → 400 BAD_REQUEST
//! JsonRejection::MissingJsonContentType  → 400 BAD_REQUEST
//! JsonRejection::JsonDataError           → 422 VALIDATION_ERROR
//! BytesRejection (over the body limit)   → 413 PAYLOAD_TOO_LARGE
//! ```

use axum::extract::rejection::{BytesRejection, JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::http::StatusCode;
use axum::Json;

use crate::error::ApiError;

/// Unwraps a JSON body extraction.
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match result {
        Ok(Json(value)) => Ok(value),
        Err(JsonRejection::JsonDataError(e)) => Err(ApiError::Validation(e.body_text())),
        Err(e) => Err(ApiError::BadRequest(e.body_text())),
    }
}

/// Unwraps a query string extraction.
pub fn extract_query<T>(result: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    result
        .map(|Query(value)| value)
        .map_err(|e| ApiError::BadRequest(e.body_text()))
}

/// Maps a raw body rejection, keeping "too large" distinct.
pub fn body_rejection(rejection: BytesRejection) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge("upload exceeds the configured size limit".to_string())
    } else {
        ApiError::BadRequest(rejection.body_text())
    }
}
