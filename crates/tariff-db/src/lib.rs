//! # tariff-db: Database Layer for the Cargo Tariff Service
//!
//! Durable storage for the tariff table. The in-memory
//! [`TariffStore`](tariff_core::TariffStore) answers every query; this crate
//! makes sure it can be rebuilt after a restart.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tariff Data Flow                                 │
//! │                                                                         │
//! │  POST /upload_tariffs                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store.prepare(records) ── validated TariffBatch                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   tariff-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repository   │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  (tariff.rs)  │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ TariffRepo    │    │ 001_create_  │  │   │
//! │  │   │               │    │  save_batch   │    │   tariffs    │  │   │
//! │  │   │               │    │  load_all     │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store.commit(batch) ── only after the transaction committed           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tariff_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("tariffs.db")).await?;
//!
//! let batch = store.prepare(&records)?;
//! db.tariffs().save_batch(&batch, IngestMode::Merge).await?;
//! store.commit(batch, IngestMode::Merge);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::tariff::TariffRepository;
