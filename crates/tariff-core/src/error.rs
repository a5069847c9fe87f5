//! # Error Types
//!
//! Domain-specific error types for tariff-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tariff-core errors (this file)                                        │
//! │  ├── CoreError        - Lookup failures + wrapped validation           │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  tariff-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  HTTP errors (in app)                                                  │
//! │  └── ApiError         - What clients see (JSON body + status)          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No tariff entry applies to the category on the requested date.
    ///
    /// ## When This Occurs
    /// - Category was never uploaded
    /// - Every entry for the category becomes effective after `date`
    ///
    /// ## User Workflow
    /// ```text
    /// calculate("Wood", 10000, "2020-06-01")
    ///      │
    ///      ▼
    /// resolve("Wood", 2020-06-01): no entry ≤ date
    ///      │
    ///      ▼
    /// TariffNotFound { category: "Wood", date: 2020-06-01 }
    ///      │
    ///      ▼
    /// Client sees 404: "no tariff for category 'Wood' effective on 2020-06-01"
    /// ```
    #[error("no tariff for category '{category}' effective on {date}")]
    TariffNotFound { category: String, date: NaiveDate },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a TariffNotFound error.
    pub fn not_found(category: impl Into<String>, date: NaiveDate) -> Self {
        CoreError::TariffNotFound {
            category: category.into(),
            date,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when uploaded records or calculation requests don't
/// meet requirements. Every variant names the offending field.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Numeric value is too large to compute with.
    #[error("{field} is too large")]
    TooLarge { field: String },

    /// Invalid format (e.g., unparseable rate, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., same category and date twice in one upload).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// A single record of a batch failed validation.
    #[error("record {index}: {error}")]
    InvalidRecord {
        index: usize,
        #[source]
        error: Box<ValidationError>,
    },

    /// The uploaded document is not a tariff document.
    #[error("invalid tariff document: {reason}")]
    InvalidDocument { reason: String },
}

impl ValidationError {
    /// Attaches the position of the failing record within a batch.
    pub fn at_record(self, index: usize) -> Self {
        ValidationError::InvalidRecord {
            index,
            error: Box::new(self),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::not_found("Wood", NaiveDate::from_ymd_opt(2020, 6, 1).unwrap());
        assert_eq!(
            err.to_string(),
            "no tariff for category 'Wood' effective on 2020-06-01"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "category".to_string(),
        };
        assert_eq!(err.to_string(), "category is required");

        let err = ValidationError::Negative {
            field: "declared_value".to_string(),
        };
        assert_eq!(err.to_string(), "declared_value must not be negative");
    }

    #[test]
    fn test_record_index_in_message() {
        let err = ValidationError::InvalidFormat {
            field: "rate".to_string(),
            reason: "not a decimal number".to_string(),
        }
        .at_record(3);

        assert_eq!(
            err.to_string(),
            "record 3: rate has invalid format: not a decimal number"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "category".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
