//! # Repository Module
//!
//! Database repository implementations for the tariff service.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Upload handler / import binary                                        │
//! │       │                                                                 │
//! │       │  db.tariffs().save_batch(&batch, mode)                         │
//! │       ▼                                                                 │
//! │  TariffRepository                                                      │
//! │  ├── load_all(&self)                                                   │
//! │  ├── save_batch(&self, batch, mode)                                    │
//! │  └── count(&self)                                                      │
//! │       │                                                                 │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite `tariffs` table                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`tariff::TariffRepository`] - Tariff table persistence

pub mod tariff;
