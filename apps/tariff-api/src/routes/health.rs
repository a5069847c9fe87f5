//! `GET /healthcheck`

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/healthcheck", get(healthcheck))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// `{"status":"ok"}`, or 503 `{"status":"degraded"}` when a configured
/// database stops answering.
async fn healthcheck(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    if let Some(db) = &state.db {
        if !db.health_check().await {
            tracing::warn!("health check failed: database unreachable");
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse { status: "degraded" }),
            );
        }
    }

    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}
