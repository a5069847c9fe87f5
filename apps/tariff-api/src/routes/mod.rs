//! HTTP route modules, one router per resource.
//!
//! - [`health`] - `GET /healthcheck`
//! - [`tariffs`] - tariff upload and inspection
//! - [`insurance`] - insurance calculation

pub mod health;
pub mod insurance;
pub mod tariffs;
