//! # Validation Module
//!
//! Input validation for uploaded tariffs and calculation requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP boundary (tariff-api)                                   │
//! │  ├── Body framing (JSON / multipart)                                   │
//! │  └── Document shape (document.rs)                                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── Field rules: category, rate, date, declared value                 │
//! │  └── Batch rules: non-empty, unique (category, date)                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  └── PRIMARY KEY (category, effective_from)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tariff_core::validation::{parse_date, parse_rate, validate_category};
//!
//! assert_eq!(validate_category("  Glass ").unwrap(), "Glass");
//! assert!(parse_rate("0.05").is_ok());
//! assert!(parse_date("effective_from", "2020-13-01").is_err());
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::types::{Rate, RawTariff, TariffEntry};
use crate::{DATE_FORMAT, MAX_CATEGORY_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a cargo category and returns it trimmed.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most MAX_CATEGORY_LEN (100) characters
/// - Case is preserved: "Glass" and "glass" are different categories
pub fn validate_category(category: &str) -> ValidationResult<String> {
    let category = category.trim();

    if category.is_empty() {
        return Err(ValidationError::Required {
            field: "category".to_string(),
        });
    }

    if category.chars().count() > MAX_CATEGORY_LEN {
        return Err(ValidationError::TooLong {
            field: "category".to_string(),
            max: MAX_CATEGORY_LEN,
        });
    }

    Ok(category.to_string())
}

/// Parses a rate from decimal text.
///
/// ## Rules
/// - Must be plain decimal text ("0.05"); exponent form is rejected
/// - Must be ≥ 0; zero is allowed (uninsured-free cargo)
///
/// ## Example
/// ```rust
/// use tariff_core::validation::parse_rate;
///
/// assert_eq!(parse_rate("0.05").unwrap().to_string(), "0.05");
/// assert!(parse_rate("-0.01").is_err());
/// assert!(parse_rate("five percent").is_err());
/// ```
pub fn parse_rate(text: &str) -> ValidationResult<Rate> {
    let text = text.trim();

    if text.is_empty() {
        return Err(ValidationError::Required {
            field: "rate".to_string(),
        });
    }

    let value = Decimal::from_str(text).map_err(|_| ValidationError::InvalidFormat {
        field: "rate".to_string(),
        reason: format!("'{}' is not a decimal number", text),
    })?;

    Rate::from_decimal(value).ok_or_else(|| ValidationError::Negative {
        field: "rate".to_string(),
    })
}

/// Parses an ISO calendar date (`YYYY-MM-DD`).
///
/// ## Arguments
/// * `field` - Field name reported in the error
/// * `text` - Date text; surrounding whitespace is ignored
pub fn parse_date(field: &str, text: &str) -> ValidationResult<NaiveDate> {
    let text = text.trim();

    if text.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: format!("'{}' is not a calendar date (expected YYYY-MM-DD)", text),
    })
}

/// Validates a declared cargo value.
///
/// ## Rules
/// - Must be ≥ 0 (zero declares uninsured cargo and costs nothing)
pub fn validate_declared_value(value: Decimal) -> ValidationResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::Negative {
            field: "declared_value".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Record & Batch Validators
// =============================================================================

/// Turns one raw record into a typed entry.
pub fn validate_record(raw: &RawTariff) -> ValidationResult<TariffEntry> {
    let category = validate_category(&raw.category)?;
    let rate = parse_rate(&raw.rate)?;
    let effective_from = parse_date("effective_from", &raw.effective_from)?;

    Ok(TariffEntry::new(category, rate, effective_from))
}

/// Validates a whole upload.
///
/// ## Rules
/// - At least one record
/// - Every record valid (the first failure aborts, tagged with its index)
/// - No two records share (category, effective_from)
///
/// ## Flow
/// ```text
/// [r0, r1, r2, ...]
///      │
///      ▼
/// validate_record(rN) ──fail──► InvalidRecord { index: N, .. }
///      │
///      ▼
/// seen (category, date)? ──yes──► InvalidRecord { index: N, Duplicate }
///      │
///      ▼
/// Vec<TariffEntry> (same order as input)
/// ```
pub fn validate_batch(records: &[RawTariff]) -> ValidationResult<Vec<TariffEntry>> {
    if records.is_empty() {
        return Err(ValidationError::Required {
            field: "tariffs".to_string(),
        });
    }

    let mut entries = Vec::with_capacity(records.len());
    let mut seen: HashSet<(String, NaiveDate)> = HashSet::with_capacity(records.len());

    for (index, raw) in records.iter().enumerate() {
        let entry = validate_record(raw).map_err(|e| e.at_record(index))?;

        if !seen.insert((entry.category.clone(), entry.effective_from)) {
            return Err(ValidationError::Duplicate {
                field: "category/effective_from".to_string(),
                value: format!("{} @ {}", entry.category, entry.effective_from),
            }
            .at_record(index));
        }

        entries.push(entry);
    }

    Ok(entries)
}

// =============================================================================
// Unit Tests
// =============================================================================
