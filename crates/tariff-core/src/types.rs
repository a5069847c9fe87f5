//! # Domain Types
//!
//! Core domain types used throughout the tariff service.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   RawTariff     │   │  TariffEntry    │   │      Rate       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  category: str  │──►│  category       │   │  Decimal ≥ 0    │       │
//! │  │  rate: str      │   │  rate: Rate     │   │  0.05 = 5%      │       │
//! │  │  date: str      │   │  effective_from │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                             │
//! │    (untrusted)            (validated)                                   │
//! │                                                                         │
//! │  ┌──────────────────────┐          ┌──────────────────────┐            │
//! │  │ CalculationRequest   │ ───────► │ CalculationResult    │            │
//! │  │  category            │          │  insurance_cost      │            │
//! │  │  declared_value      │          │  category, rate      │            │
//! │  │  date (ISO string)   │          │  date, effective_from│            │
//! │  └──────────────────────┘          └──────────────────────┘            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Rate
// =============================================================================

/// Insurance rate as an exact decimal fraction (0.05 = 5%).
///
/// ## Invariant
/// Never negative. The only constructor is [`Rate::from_decimal`], which
/// rejects negative values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Rate(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Rate {
    /// Creates a rate, or `None` if the value is negative.
    pub fn from_decimal(value: Decimal) -> Option<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            return None;
        }
        Some(Rate(value.normalize()))
    }

    /// Returns the rate as a decimal fraction.
    #[inline]
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Tariff Entry
// =============================================================================

/// A validated tariff: `rate` applies to `category` from `effective_from`
/// (inclusive) until superseded by a later entry of the same category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TariffEntry {
    /// Cargo class identifier (case-sensitive).
    pub category: String,

    /// Rate applied to the declared value.
    pub rate: Rate,

    /// First day this rate applies.
    pub effective_from: NaiveDate,
}

impl TariffEntry {
    /// Creates a tariff entry from already-validated parts.
    pub fn new(category: impl Into<String>, rate: Rate, effective_from: NaiveDate) -> Self {
        TariffEntry {
            category: category.into(),
            rate,
            effective_from,
        }
    }
}

// =============================================================================
// Raw Tariff
// =============================================================================

/// An untrusted tariff record as it arrives from an upload or import.
///
/// All fields are text; [`crate::validation::validate_record`] turns a
/// `RawTariff` into a [`TariffEntry`] or explains why it can't.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTariff {
    pub category: String,
    pub rate: String,
    pub effective_from: String,
}

impl RawTariff {
    /// Creates a raw record.
    pub fn new(
        category: impl Into<String>,
        rate: impl Into<String>,
        effective_from: impl Into<String>,
    ) -> Self {
        RawTariff {
            category: category.into(),
            rate: rate.into(),
            effective_from: effective_from.into(),
        }
    }
}

// =============================================================================
// Ingest Mode
// =============================================================================

/// How an ingested batch combines with the tariffs already stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngestMode {
    /// Add the batch; entries with the same (category, date) are overwritten.
    Merge,
    /// Discard everything stored, keep only the batch.
    Replace,
}

impl IngestMode {
    /// Returns the lowercase name used in configuration and query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestMode::Merge => "merge",
            IngestMode::Replace => "replace",
        }
    }
}

impl Default for IngestMode {
    fn default() -> Self {
        IngestMode::Merge
    }
}

impl fmt::Display for IngestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IngestMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "merge" => Ok(IngestMode::Merge),
            "replace" => Ok(IngestMode::Replace),
            other => Err(ValidationError::InvalidFormat {
                field: "mode".to_string(),
                reason: format!("expected 'merge' or 'replace', got '{}'", other),
            }),
        }
    }
}

// =============================================================================
// Ingest Summary
// =============================================================================

/// Outcome of a committed ingest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestSummary {
    /// Identifier of this ingest (also persisted with each row).
    pub batch_id: Uuid,
    pub mode: IngestMode,
    /// Records in the batch.
    pub loaded: usize,
    /// Batch entries whose key was not stored before.
    pub added: usize,
    /// Batch entries that overwrote a stored entry with the same key.
    pub replaced: usize,
    /// Entries in the store after the commit.
    pub total: usize,
}

// =============================================================================
// Calculation
// =============================================================================

/// A request to price insurance for one consignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculationRequest {
    pub category: String,
    /// Declared cargo value, must be ≥ 0.
    pub declared_value: Decimal,
    /// ISO calendar date (`YYYY-MM-DD`) the tariff is resolved for.
    pub date: String,
}

impl CalculationRequest {
    /// Creates a calculation request.
    pub fn new(category: impl Into<String>, declared_value: Decimal, date: impl Into<String>) -> Self {
        CalculationRequest {
            category: category.into(),
            declared_value,
            date: date.into(),
        }
    }
}

/// The priced request, with the tariff that was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculationResult {
    /// declared_value × rate, rounded half up to cents.
    pub insurance_cost: Money,
    pub category: String,
    pub rate: Rate,
    /// The date the request asked for.
    pub date: NaiveDate,
    /// The date the applied tariff became effective.
    pub effective_from: NaiveDate,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_rejects_negative() {
        assert!(Rate::from_decimal(Decimal::new(-1, 2)).is_none());
        assert!(Rate::from_decimal(Decimal::ZERO).is_some());
        assert_eq!(Rate::from_decimal(Decimal::new(5, 2)).unwrap().to_string(), "0.05");
    }

    #[test]
    fn test_rate_is_normalized() {
        // "0.050" and "0.05" are the same rate
        let a = Rate::from_decimal(Decimal::new(50, 3)).unwrap();
        let b = Rate::from_decimal(Decimal::new(5, 2)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rate_serializes_as_number() {
        let rate = Rate::from_decimal(Decimal::new(5, 2)).unwrap();
        assert_eq!(serde_json::to_string(&rate).unwrap(), "0.05");
    }

    #[test]
    fn test_entry_serializes_camel_case() {
        let entry = TariffEntry::new(
            "Glass",
            Rate::from_decimal(Decimal::new(8, 2)).unwrap(),
            NaiveDate::from_ymd_opt(2020, 7, 1).unwrap(),
        );
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"category": "Glass", "rate": 0.08, "effectiveFrom": "2020-07-01"})
        );
    }

    #[test]
    fn test_ingest_mode_parsing() {
        assert_eq!("merge".parse::<IngestMode>().unwrap(), IngestMode::Merge);
        assert_eq!(" Replace ".parse::<IngestMode>().unwrap(), IngestMode::Replace);
        assert!("append".parse::<IngestMode>().is_err());
        assert_eq!(IngestMode::default(), IngestMode::Merge);
    }
}
