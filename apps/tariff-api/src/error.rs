//! # API Error Types
//!
//! The one error type handlers return. Implements `IntoResponse`, mapping
//! domain and database errors to a status code and a JSON body:
//!
//! ```text
//! {"error": {"code": "NOT_FOUND", "message": "no tariff for category 'Wood' ..."}}
//! ```
//!
//! ## Mapping
//! ```text
//! ┌──────────────────────────────────┬────────┬──────────────────────┐
//! │ Source                           │ Status │ Code                 │
//! ├──────────────────────────────────┼────────┼──────────────────────┤
//! │ ValidationError                  │  422   │ VALIDATION_ERROR     │
//! │ CoreError::TariffNotFound        │  404   │ NOT_FOUND            │
//! │ malformed JSON / multipart       │  400   │ BAD_REQUEST          │
//! │ body over the upload limit       │  413   │ PAYLOAD_TOO_LARGE    │
//! │ DbError                          │  500   │ INTERNAL_ERROR       │
//! └──────────────────────────────────┴────────┴──────────────────────┘
//! ```
//!
//! Internal errors are logged with their detail; the client only sees a
//! generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tariff_core::{CoreError, ValidationError};
use tariff_db::DbError;

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable code, e.g. `VALIDATION_ERROR`.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

/// Errors returned by handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Input failed validation (422).
    #[error("{0}")]
    Validation(String),

    /// No tariff applies (404).
    #[error("{0}")]
    NotFound(String),

    /// Body could not be read as JSON or multipart (400).
    #[error("{0}")]
    BadRequest(String),

    /// Body exceeds the configured upload limit (413).
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Server-side failure (500). Never shown to the client.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status and machine-readable code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(detail) => {
                tracing::error!(error = %detail, "internal server error");
                "An internal error occurred".to_string()
            }
            other => {
                tracing::debug!(code, error = %other, "request rejected");
                other.to_string()
            }
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

// =============================================================================
// Conversions
// =============================================================================

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::TariffNotFound { .. } => Self::NotFound(err.to_string()),
            CoreError::Validation(inner) => inner.into(),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        Self::Internal(err.to_string())
    }
}
