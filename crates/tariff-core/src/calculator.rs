//! # Insurance Calculator
//!
//! Prices insurance for a consignment from the tariff in force on a date.
//!
//! ## Calculation Flow
//! ```text
//! CalculationRequest { "Glass", 10000, "2020-06-01" }
//!        │
//!        ├── declared_value ≥ 0 ?          ──no──► ValidationError
//!        ├── date is YYYY-MM-DD ?          ──no──► ValidationError
//!        │
//!        ▼
//! store.resolve("Glass", 2020-06-01)       ──none──► TariffNotFound
//!        │  rate 0.05 (from 2020-01-01)
//!        ▼
//! 10000 × 0.05 = 500   (exact decimal, checked)
//!        │
//!        ▼
//! round half up to cents → Money(50000) = 500.00
//! ```

use std::sync::Arc;
use tracing::debug;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::store::TariffStore;
use crate::types::{CalculationRequest, CalculationResult};
use crate::validation::{parse_date, validate_category, validate_declared_value};

/// Computes insurance costs against a shared [`TariffStore`].
#[derive(Debug, Clone)]
pub struct InsuranceCalculator {
    store: Arc<TariffStore>,
}

impl InsuranceCalculator {
    /// Creates a calculator reading from `store`.
    pub fn new(store: Arc<TariffStore>) -> Self {
        InsuranceCalculator { store }
    }

    /// Prices one request.
    ///
    /// ## Errors
    /// - `CoreError::Validation` - negative value, malformed date, blank
    ///   category, or a product too large to represent
    /// - `CoreError::TariffNotFound` - no tariff in force for the category
    pub fn calculate(&self, request: &CalculationRequest) -> CoreResult<CalculationResult> {
        validate_declared_value(request.declared_value)?;
        let date = parse_date("date", &request.date)?;
        let category = validate_category(&request.category)?;

        let entry = self.store.resolve(&category, date)?;

        let too_large = || ValidationError::TooLarge {
            field: "declared_value".to_string(),
        };
        let product = request
            .declared_value
            .checked_mul(entry.rate.value())
            .ok_or_else(too_large)?;
        let insurance_cost = Money::from_decimal_rounded(product).ok_or_else(too_large)?;

        debug!(
            category = %category,
            date = %date,
            rate = %entry.rate,
            declared_value = %request.declared_value,
            insurance_cost = %insurance_cost,
            "Insurance calculated"
        );

        Ok(CalculationResult {
            insurance_cost,
            category,
            rate: entry.rate,
            date,
            effective_from: entry.effective_from,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::types::{IngestMode, RawTariff};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn calculator() -> InsuranceCalculator {
        let store = Arc::new(TariffStore::new());
        store
            .ingest(
                &[
                    RawTariff::new("Glass", "0.05", "2020-01-01"),
                    RawTariff::new("Glass", "0.08", "2020-07-01"),
                    RawTariff::new("Metal", "0.03", "2020-06-01"),
                ],
                IngestMode::Merge,
            )
            .unwrap();
        InsuranceCalculator::new(store)
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_glass_example() {
        let result = calculator()
            .calculate(&CalculationRequest::new("Glass", dec("10000.0"), "2020-06-01"))
            .unwrap();

        assert_eq!(result.insurance_cost, Money::from_cents(50000));
        assert_eq!(result.rate.to_string(), "0.05");
        assert_eq!(result.date, NaiveDate::from_ymd_opt(2020, 6, 1).unwrap());
        assert_eq!(result.effective_from, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
    }

    #[test]
    fn test_later_tariff_applies_from_its_date() {
        let result = calculator()
            .calculate(&CalculationRequest::new("Glass", dec("10000"), "2020-07-01"))
            .unwrap();
        assert_eq!(result.insurance_cost.to_string(), "800.00");
    }

    #[test]
    fn test_cost_rounds_half_up() {
        // 4.5 × 0.03 = 0.135 → 0.14
        let result = calculator()
            .calculate(&CalculationRequest::new("Metal", dec("4.5"), "2020-06-01"))
            .unwrap();
        assert_eq!(result.insurance_cost.cents(), 14);
    }

    #[test]
    fn test_zero_value_costs_nothing() {
        let result = calculator()
            .calculate(&CalculationRequest::new("Glass", Decimal::ZERO, "2020-06-01"))
            .unwrap();
        assert!(result.insurance_cost.is_zero());
    }

    #[test]
    fn test_negative_value_is_rejected_without_data() {
        let empty = InsuranceCalculator::new(Arc::new(TariffStore::new()));
        let err = empty
            .calculate(&CalculationRequest::new("Glass", Decimal::NEGATIVE_ONE, "2020-06-01"))
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::Negative { .. })));
    }

    #[test]
    fn test_malformed_date_is_rejected() {
        let err = calculator()
            .calculate(&CalculationRequest::new("Glass", dec("100"), "2020-6-1x"))
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::InvalidFormat { .. })));
    }

    #[test]
    fn test_unknown_category_propagates_not_found() {
        let err = calculator()
            .calculate(&CalculationRequest::new("Wood", dec("100"), "2020-06-01"))
            .unwrap_err();
        assert!(matches!(err, CoreError::TariffNotFound { .. }));
    }

    #[test]
    fn test_overflow_is_a_validation_error() {
        let store = Arc::new(TariffStore::new());
        store
            .ingest(&[RawTariff::new("Gold", "1000", "2020-01-01")], IngestMode::Merge)
            .unwrap();

        let err = InsuranceCalculator::new(store)
            .calculate(&CalculationRequest::new("Gold", Decimal::MAX, "2020-06-01"))
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::TooLarge { .. })));
    }
}
