//! # Tariff Store
//!
//! Holds every known tariff and answers "which rate applies to category C
//! on date D".
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  TariffStore                                                            │
//! │  └── RwLock<Arc<TariffBook>>                                            │
//! │        └── category ──► BTreeMap<effective_from, TariffEntry>           │
//! │                                                                         │
//! │  "Glass" ──► 2020-01-01 → 0.05                                          │
//! │              2020-07-01 → 0.08                                          │
//! │  "Metal" ──► 2020-06-01 → 0.03                                          │
//! │                                                                         │
//! │  resolve("Glass", 2020-06-01)                                           │
//! │     = last entry with effective_from ≤ 2020-06-01                       │
//! │     = range(..=2020-06-01).next_back()                                  │
//! │     = 0.05                                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ingest Flow
//! ```text
//! &[RawTariff] ──prepare──► TariffBatch ──commit(mode)──► IngestSummary
//!                 (pure,                  (clone book, apply batch,
//!                  may fail)               swap under write lock)
//! ```
//!
//! A persistence layer writes the batch between `prepare` and `commit`, so
//! the in-memory book only ever reflects durably stored data. Readers hold
//! the read lock just long enough to look at one book; they see either the
//! whole old book or the whole new one.

use chrono::NaiveDate;
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::types::{IngestMode, IngestSummary, RawTariff, TariffEntry};
use crate::validation::{validate_batch, ValidationResult};

// =============================================================================
// Tariff Book
// =============================================================================

/// An immutable-once-published set of tariffs, indexed for as-of lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TariffBook {
    by_category: BTreeMap<String, BTreeMap<NaiveDate, TariffEntry>>,
}

impl TariffBook {
    /// Creates an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a book from entries; a later entry wins over an earlier one
    /// with the same key.
    pub fn from_entries(entries: impl IntoIterator<Item = TariffEntry>) -> Self {
        let mut book = TariffBook::new();
        for entry in entries {
            book.insert(entry);
        }
        book
    }

    /// Inserts an entry, returning `true` if it replaced one with the same
    /// (category, effective_from).
    pub fn insert(&mut self, entry: TariffEntry) -> bool {
        self.by_category
            .entry(entry.category.clone())
            .or_default()
            .insert(entry.effective_from, entry)
            .is_some()
    }

    /// Checks whether an entry with this key exists.
    pub fn contains(&self, category: &str, effective_from: NaiveDate) -> bool {
        self.by_category
            .get(category)
            .is_some_and(|dates| dates.contains_key(&effective_from))
    }

    /// The entry in force for `category` on `date`, if any.
    pub fn resolve(&self, category: &str, date: NaiveDate) -> Option<&TariffEntry> {
        self.by_category
            .get(category)?
            .range(..=date)
            .next_back()
            .map(|(_, entry)| entry)
    }

    /// Entries ordered by category, then by effective date.
    ///
    /// With `Some(category)` only that category is listed (empty if unknown).
    pub fn entries(&self, category: Option<&str>) -> Vec<TariffEntry> {
        match category {
            Some(category) => self
                .by_category
                .get(category)
                .map(|dates| dates.values().cloned().collect())
                .unwrap_or_default(),
            None => self
                .by_category
                .values()
                .flat_map(|dates| dates.values().cloned())
                .collect(),
        }
    }

    /// Known categories in sorted order.
    pub fn categories(&self) -> Vec<String> {
        self.by_category.keys().cloned().collect()
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.by_category.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_category.is_empty()
    }
}

// =============================================================================
// Tariff Batch
// =============================================================================

/// A fully validated upload, ready to be persisted and committed.
///
/// Only [`TariffBatch::from_raw`] creates one, so holding a batch means
/// every entry passed validation and no key repeats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TariffBatch {
    id: Uuid,
    entries: Vec<TariffEntry>,
}

impl TariffBatch {
    /// Validates raw records into a batch with a fresh id.
    pub fn from_raw(records: &[RawTariff]) -> ValidationResult<Self> {
        let entries = validate_batch(records)?;
        Ok(TariffBatch {
            id: Uuid::new_v4(),
            entries,
        })
    }

    /// Identifier shared by every row written for this batch.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Entries in upload order.
    pub fn entries(&self) -> &[TariffEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Tariff Store
// =============================================================================

/// Thread-safe owner of the current [`TariffBook`].
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use tariff_core::{CoreError, IngestMode, RawTariff, TariffStore};
///
/// let store = TariffStore::new();
/// store.ingest(&[
///     RawTariff::new("Glass", "0.05", "2020-01-01"),
///     RawTariff::new("Glass", "0.08", "2020-07-01"),
/// ], IngestMode::Merge).unwrap();
///
/// let june = NaiveDate::from_ymd_opt(2020, 6, 1).unwrap();
/// assert_eq!(store.resolve("Glass", june).unwrap().rate.to_string(), "0.05");
///
/// let early = NaiveDate::from_ymd_opt(2019, 12, 31).unwrap();
/// assert!(matches!(store.resolve("Glass", early), Err(CoreError::TariffNotFound { .. })));
/// ```
#[derive(Debug, Default)]
pub struct TariffStore {
    book: RwLock<Arc<TariffBook>>,
    /// Serializes commits so two writers can't publish from the same base.
    commit_lock: Mutex<()>,
}

impl TariffStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `entries` (e.g. rows loaded from the
    /// database at startup).
    pub fn from_entries(entries: impl IntoIterator<Item = TariffEntry>) -> Self {
        let book = TariffBook::from_entries(entries);
        debug!(entries = book.len(), "Tariff store loaded");
        TariffStore {
            book: RwLock::new(Arc::new(book)),
            commit_lock: Mutex::new(()),
        }
    }

    // -------------------------------------------------------------------------
    // Ingest
    // -------------------------------------------------------------------------

    /// Validates raw records. Does not touch the store.
    pub fn prepare(&self, records: &[RawTariff]) -> ValidationResult<TariffBatch> {
        let batch = TariffBatch::from_raw(records)?;
        debug!(batch_id = %batch.id(), records = batch.len(), "Tariff batch prepared");
        Ok(batch)
    }

    /// Publishes a prepared batch.
    ///
    /// ## Modes
    /// - `Merge`: batch entries are added; same-key entries are overwritten
    /// - `Replace`: the store holds exactly the batch afterwards
    ///
    /// `added`/`replaced` are counted against the book before the commit.
    pub fn commit(&self, batch: TariffBatch, mode: IngestMode) -> IngestSummary {
        let _guard = self.commit_lock.lock();
        let current = self.snapshot();

        let mut next = match mode {
            IngestMode::Merge => (*current).clone(),
            IngestMode::Replace => TariffBook::new(),
        };

        let loaded = batch.len();
        let batch_id = batch.id();
        let mut replaced = 0;

        for entry in batch.entries {
            if current.contains(&entry.category, entry.effective_from) {
                replaced += 1;
            }
            next.insert(entry);
        }

        let total = next.len();
        *self.book.write() = Arc::new(next);

        let summary = IngestSummary {
            batch_id,
            mode,
            loaded,
            added: loaded - replaced,
            replaced,
            total,
        };

        info!(
            batch_id = %summary.batch_id,
            mode = %summary.mode,
            loaded = summary.loaded,
            added = summary.added,
            replaced = summary.replaced,
            total = summary.total,
            "Tariff batch committed"
        );

        summary
    }

    /// Validates and publishes in one step.
    ///
    /// A bad record fails the whole call and leaves the store untouched.
    pub fn ingest(&self, records: &[RawTariff], mode: IngestMode) -> ValidationResult<IngestSummary> {
        let batch = self.prepare(records)?;
        Ok(self.commit(batch, mode))
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// The entry in force for `category` on `date`.
    ///
    /// ## Rule
    /// Among the category's entries with `effective_from ≤ date`, the one
    /// with the latest `effective_from`. The boundary is inclusive.
    pub fn resolve(&self, category: &str, date: NaiveDate) -> CoreResult<TariffEntry> {
        let resolved = self.book.read().resolve(category, date).cloned();

        match resolved {
            Some(entry) => {
                debug!(
                    category = %category,
                    date = %date,
                    effective_from = %entry.effective_from,
                    rate = %entry.rate,
                    "Tariff resolved"
                );
                Ok(entry)
            }
            None => {
                debug!(category = %category, date = %date, "No tariff in force");
                Err(CoreError::not_found(category, date))
            }
        }
    }

    /// Stored entries ordered by category then date, optionally filtered.
    pub fn entries(&self, category: Option<&str>) -> Vec<TariffEntry> {
        self.book.read().entries(category)
    }

    /// Known categories in sorted order.
    pub fn categories(&self) -> Vec<String> {
        self.book.read().categories()
    }

    pub fn len(&self) -> usize {
        self.book.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.book.read().is_empty()
    }

    /// The currently published book.
    pub fn snapshot(&self) -> Arc<TariffBook> {
        Arc::clone(&self.book.read())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
