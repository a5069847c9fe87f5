//! # tariff-api: HTTP Service for Cargo Insurance Tariffs
//!
//! Exposes the tariff store and insurance calculator over HTTP.
//!
//! ## Routes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET  /healthcheck                   liveness (+ database reachability) │
//! │  POST /upload_tariffs                ingest a tariff document           │
//! │  POST /calculate_insurance           price a consignment                │
//! │  GET  /tariffs?category=             list stored tariffs                │
//! │  GET  /tariffs/resolve?category=&date=  tariff in force on a date       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Layers (outermost first)
//! `TraceLayer` → `DefaultBodyLimit(max_upload_bytes)` → handler

pub mod config;
pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the application router.
pub fn app(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .merge(routes::health::router())
        .merge(routes::tariffs::router())
        .merge(routes::insurance::router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
