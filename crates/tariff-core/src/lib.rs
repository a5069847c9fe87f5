//! # tariff-core: Pure Business Logic for Cargo Tariffs
//!
//! This crate is the **heart** of the tariff service. It resolves which
//! insurance rate applies to a cargo category on a given date and turns a
//! declared value into an insurance cost. Zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Cargo Tariff Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP API (tariff-api)                        │   │
//! │  │       POST /upload_tariffs      POST /calculate_insurance       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tariff-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ document  │  │validation │  │   store   │  │calculator │  │   │
//! │  │   │  JSON →   │─►│  raw →    │─►│  resolve  │◄─│ value ×   │  │   │
//! │  │   │ RawTariff │  │  typed    │  │  as-of    │  │   rate    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   tariff-db (Database Layer)                    │   │
//! │  │              SQLite tariffs table, migrations                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (TariffEntry, Rate, CalculationResult, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Field and batch validation
//! - [`document`] - Tariff upload document parsing
//! - [`store`] - The tariff store and as-of-date resolution
//! - [`calculator`] - Insurance cost calculation
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use rust_decimal::Decimal;
//! use tariff_core::{CalculationRequest, InsuranceCalculator, IngestMode, RawTariff, TariffStore};
//!
//! let store = Arc::new(TariffStore::new());
//! store
//!     .ingest(&[RawTariff::new("Glass", "0.05", "2020-01-01")], IngestMode::Merge)
//!     .unwrap();
//!
//! let calculator = InsuranceCalculator::new(store);
//! let request = CalculationRequest::new("Glass", Decimal::new(10000, 0), "2020-06-01");
//! let result = calculator.calculate(&request).unwrap();
//!
//! assert_eq!(result.insurance_cost.cents(), 50000); // 500.00
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calculator;
pub mod document;
pub mod error;
pub mod money;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use calculator::InsuranceCalculator;
pub use document::parse_document;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use store::{TariffBatch, TariffBook, TariffStore};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Date format for every date crossing the API boundary (ISO 8601 calendar date).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Maximum length of a cargo category identifier.
pub const MAX_CATEGORY_LEN: usize = 100;

/// Decimal places of the currency's minor unit.
pub const MONEY_SCALE: u32 = 2;
