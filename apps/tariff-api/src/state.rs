//! Shared application state.
//!
//! ```text
//! AppState (Clone, one per handler call)
//! ├── store        Arc<TariffStore>        ← resolve / commit
//! ├── calculator   InsuranceCalculator     ← same Arc<TariffStore>
//! ├── db           Option<Database>        ← None = memory only
//! ├── ingest_gate  Arc<Mutex<()>>          ← one upload at a time
//! └── config       Arc<TariffConfig>
//! ```

use std::sync::Arc;
use tokio::sync::Mutex;

use tariff_core::{InsuranceCalculator, TariffStore};
use tariff_db::Database;

use crate::config::TariffConfig;

/// State handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<TariffStore>,
    pub calculator: InsuranceCalculator,
    pub db: Option<Database>,
    /// Held across validate → persist → commit so two uploads can't
    /// interleave their database writes and store swaps.
    pub ingest_gate: Arc<Mutex<()>>,
    pub config: Arc<TariffConfig>,
}

impl AppState {
    /// Memory-only state with an empty store.
    pub fn new(config: TariffConfig) -> Self {
        Self::build(config, Arc::new(TariffStore::new()), None)
    }

    /// State backed by `db`; `store` should already hold the rows loaded
    /// from it.
    pub fn with_database(config: TariffConfig, store: Arc<TariffStore>, db: Database) -> Self {
        Self::build(config, store, Some(db))
    }

    fn build(config: TariffConfig, store: Arc<TariffStore>, db: Option<Database>) -> Self {
        AppState {
            calculator: InsuranceCalculator::new(Arc::clone(&store)),
            store,
            db,
            ingest_gate: Arc::new(Mutex::new(())),
            config: Arc::new(config),
        }
    }
}
