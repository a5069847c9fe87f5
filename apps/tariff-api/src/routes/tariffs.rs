//! # Tariff Routes
//!
//! - `POST /upload_tariffs`          - Ingest a tariff document (also `/upload_tariffs/`)
//! - `GET  /tariffs?category=`       - List stored tariffs
//! - `GET  /tariffs/resolve?category=&date=` - The tariff in force on a date
//!
//! ## Upload Flow
//! ```text
//! body (multipart `file` part, or raw JSON)
//!   │
//!   ▼
//! ingest_gate.lock()            ← one upload at a time
//!   │
//!   ▼
//! parse_document → store.prepare   ──fail──► 422, nothing written
//!   │
//!   ▼
//! db.tariffs().save_batch       ──fail──► 500, store unchanged
//!   │  (skipped without a database)
//!   ▼
//! store.commit → IngestSummary  → 200
//! ```

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{FromRequest, Multipart, Query, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use tariff_core::validation::{parse_date, validate_category};
use tariff_core::{parse_document, IngestMode, IngestSummary, TariffEntry, ValidationError};

use crate::error::ApiError;
use crate::extractors::{body_rejection, extract_query};
use crate::state::AppState;

/// Name of the multipart part holding the document.
const FILE_PART: &str = "file";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload_tariffs", post(upload_tariffs))
        .route("/upload_tariffs/", post(upload_tariffs))
        .route("/tariffs", get(list_tariffs))
        .route("/tariffs/resolve", get(resolve_tariff))
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    /// `merge` or `replace`; the configured default when absent.
    pub mode: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub summary: IngestSummary,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TariffListResponse {
    pub count: usize,
    pub tariffs: Vec<TariffEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveParams {
    pub category: Option<String>,
    pub date: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn upload_tariffs(
    State(state): State<AppState>,
    params: Result<Query<UploadParams>, QueryRejection>,
    request: Request,
) -> Result<Json<UploadResponse>, ApiError> {
    let params = extract_query(params)?;
    let mode = match params.mode {
        Some(mode) => mode.parse::<IngestMode>()?,
        None => state.config.ingest_mode,
    };

    let body = read_upload(request, &state).await?;

    let _gate = state.ingest_gate.lock().await;

    let records = parse_document(&body)?;
    let batch = state.store.prepare(&records)?;

    if let Some(db) = &state.db {
        db.tariffs().save_batch(&batch, mode).await?;
    }

    let summary = state.store.commit(batch, mode);

    Ok(Json(UploadResponse {
        status: "success",
        summary,
    }))
}

async fn list_tariffs(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<TariffListResponse>, ApiError> {
    let params = extract_query(params)?;

    let tariffs = state.store.entries(params.category.as_deref().map(str::trim));

    Ok(Json(TariffListResponse {
        count: tariffs.len(),
        tariffs,
    }))
}

async fn resolve_tariff(
    State(state): State<AppState>,
    params: Result<Query<ResolveParams>, QueryRejection>,
) -> Result<Json<TariffEntry>, ApiError> {
    let params = extract_query(params)?;

    let category = validate_category(params.category.as_deref().unwrap_or_default())?;
    let date = match params.date.as_deref() {
        Some(date) => parse_date("date", date)?,
        None => {
            return Err(ValidationError::Required {
                field: "date".to_string(),
            }
            .into())
        }
    };

    Ok(Json(state.store.resolve(&category, date)?))
}

// ---------------------------------------------------------------------------
// Body reading
// ---------------------------------------------------------------------------

/// Reads the document from a multipart `file` part or, for any other
/// content type, the raw body.
async fn read_upload(request: Request, state: &AppState) -> Result<Bytes, ApiError> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"));

    if !is_multipart {
        return Bytes::from_request(request, state).await.map_err(body_rejection);
    }

    let mut multipart = Multipart::from_request(request, state)
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some(FILE_PART) {
            return field.bytes().await.map_err(multipart_error);
        }
    }

    Err(ApiError::BadRequest(format!(
        "multipart body has no '{}' part",
        FILE_PART
    )))
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge("upload exceeds the configured size limit".to_string())
    } else {
        ApiError::BadRequest(err.body_text())
    }
}
