//! # Insurance Routes
//!
//! - `POST /calculate_insurance` (also with a trailing slash)
//!
//! ## Request
//! ```json
//! {"category": "Glass", "declaredValue": 10000.0, "date": "2020-06-01"}
//! ```
//! `cargo_type` and `declared_value` are accepted as aliases.
//!
//! ## Response
//! ```json
//! {"insuranceCost": 500.0, "category": "Glass", "rate": 0.05,
//!  "date": "2020-06-01", "effectiveFrom": "2020-01-01"}
//! ```

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tariff_core::{CalculationRequest, CalculationResult, Rate};

use crate::error::ApiError;
use crate::extractors::extract_json;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/calculate_insurance", post(calculate_insurance))
        .route("/calculate_insurance/", post(calculate_insurance))
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalculateBody {
    #[serde(alias = "cargo_type")]
    pub category: String,
    /// Accepts a JSON number or decimal string.
    #[serde(rename = "declaredValue", alias = "declared_value")]
    pub declared_value: Decimal,
    pub date: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub insurance_cost: Decimal,
    pub category: String,
    pub rate: Rate,
    pub date: NaiveDate,
    pub effective_from: NaiveDate,
}

impl From<CalculationResult> for CalculateResponse {
    fn from(result: CalculationResult) -> Self {
        CalculateResponse {
            insurance_cost: result.insurance_cost.to_decimal(),
            category: result.category,
            rate: result.rate,
            date: result.date,
            effective_from: result.effective_from,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn calculate_insurance(
    State(state): State<AppState>,
    body: Result<Json<CalculateBody>, JsonRejection>,
) -> Result<Json<CalculateResponse>, ApiError> {
    let body = extract_json(body)?;

    let request = CalculationRequest::new(body.category, body.declared_value, body.date);
    let result = state.calculator.calculate(&request)?;

    Ok(Json(result.into()))
}
