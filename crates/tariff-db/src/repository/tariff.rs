//! # Tariff Repository
//!
//! Persists validated tariff batches and reloads them at startup.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   SINGLE TRANSACTION per batch                          │
//! │                                                                         │
//! │  mode = Replace?  ──yes──►  DELETE FROM tariffs                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  for entry in batch:                                                    │
//! │     INSERT INTO tariffs (...) VALUES (...)                              │
//! │     ON CONFLICT (category, effective_from) DO UPDATE ...                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COMMIT ← all rows or none                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Read Path
//! Rows are re-validated on load with the same rules uploads go through, so
//! a hand-edited table can't smuggle a negative rate into the store.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use tariff_core::validation::validate_record;
use tariff_core::{IngestMode, RawTariff, TariffBatch, TariffEntry};

use crate::error::{DbError, DbResult};

// =============================================================================
// Row Type
// =============================================================================

/// A row of the `tariffs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TariffRecord {
    pub category: String,
    /// `YYYY-MM-DD`
    pub effective_from: String,
    /// Decimal text, e.g. `0.05`
    pub rate: String,
    pub batch_id: String,
    /// RFC 3339 timestamp of the write
    pub loaded_at: String,
}

impl TariffRecord {
    /// Converts the row back into a domain entry.
    ///
    /// ## Errors
    /// `DbError::CorruptRow` if the stored values no longer validate.
    pub fn into_entry(self) -> DbResult<TariffEntry> {
        let raw = RawTariff::new(self.category, self.rate, self.effective_from);

        validate_record(&raw).map_err(|e| DbError::CorruptRow {
            category: raw.category.clone(),
            effective_from: raw.effective_from.clone(),
            reason: e.to_string(),
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for the `tariffs` table.
#[derive(Debug, Clone)]
pub struct TariffRepository {
    pool: SqlitePool,
}

impl TariffRepository {
    /// Creates a new TariffRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TariffRepository { pool }
    }

    /// Loads every stored tariff, ordered by category then date.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let store = TariffStore::from_entries(db.tariffs().load_all().await?);
    /// ```
    pub async fn load_all(&self) -> DbResult<Vec<TariffEntry>> {
        let records = sqlx::query_as::<_, TariffRecord>(
            r#"
            SELECT category, effective_from, rate, batch_id, loaded_at
            FROM tariffs
            ORDER BY category, effective_from
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(rows = records.len(), "Loaded tariff rows");

        records.into_iter().map(TariffRecord::into_entry).collect()
    }

    /// Writes a batch in one transaction.
    ///
    /// ## Arguments
    /// * `batch` - Validated entries; its id is stored in every row
    /// * `mode` - `Replace` empties the table first, `Merge` upserts
    ///
    /// ## Returns
    /// Number of rows written.
    pub async fn save_batch(&self, batch: &TariffBatch, mode: IngestMode) -> DbResult<u64> {
        let batch_id = batch.id().to_string();
        let loaded_at = Utc::now().to_rfc3339();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        if mode == IngestMode::Replace {
            let deleted = sqlx::query("DELETE FROM tariffs")
                .execute(&mut *tx)
                .await?
                .rows_affected();
            debug!(batch_id = %batch_id, deleted, "Cleared tariffs for replace");
        }

        let mut written = 0;
        for entry in batch.entries() {
            written += sqlx::query(
                r#"
                INSERT INTO tariffs (category, effective_from, rate, batch_id, loaded_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT (category, effective_from) DO UPDATE SET
                    rate = excluded.rate,
                    batch_id = excluded.batch_id,
                    loaded_at = excluded.loaded_at
                "#,
            )
            .bind(&entry.category)
            .bind(entry.effective_from.to_string())
            .bind(entry.rate.to_string())
            .bind(&batch_id)
            .bind(&loaded_at)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(batch_id = %batch_id, mode = %mode, rows = written, "Tariff batch persisted");

        Ok(written)
    }

    /// Counts stored tariffs.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tariffs")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
