//! # Money Module
//!
//! Provides the `Money` type for insurance costs.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    10000.0 × 0.07 = 700.0000000000001  ❌ WRONG!                        │
//! │                                                                         │
//! │  OUR SOLUTION: Decimal math, then Integer Cents                         │
//! │    10000 × 0.07 = 700.00 (exact decimal)                                │
//! │    round half up to 2 places → 70000 cents                              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rust_decimal::Decimal;
//! use tariff_core::money::Money;
//!
//! // 0.125 rounds half up to 0.13
//! let cost = Money::from_decimal_rounded(Decimal::new(125, 3)).unwrap();
//! assert_eq!(cost.cents(), 13);
//! assert_eq!(cost.to_string(), "0.13");
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;

use crate::MONEY_SCALE;

/// Minor units per major unit (cents per unit).
const MINOR_PER_MAJOR: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Where Money is Used
/// ```text
/// declared value (Decimal) × rate (Decimal)
///        │
///        ▼
/// Money::from_decimal_rounded ← THIS TYPE
///        │
///        ▼
/// CalculationResult.insurance_cost ──► JSON "insuranceCost": 500.0
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use tariff_core::money::Money;
    ///
    /// let cost = Money::from_cents(50000); // Represents 500.00
    /// assert_eq!(cost.cents(), 50000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Rounds a decimal amount to cents using round-half-up.
    ///
    /// ## Rounding
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  ROUND HALF UP (MidpointAwayFromZero)                               │
    /// │                                                                     │
    /// │    0.124 → 0.12                                                     │
    /// │    0.125 → 0.13    (midpoint goes up)                               │
    /// │    0.126 → 0.13                                                     │
    /// │                                                                     │
    /// │  Insurance costs are never negative, so "away from zero" and       │
    /// │  "up" are the same thing here.                                      │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ## Returns
    /// * `Some(Money)` - Rounded amount
    /// * `None` - Amount doesn't fit in i64 cents
    pub fn from_decimal_rounded(amount: Decimal) -> Option<Self> {
        let rounded = amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
        let cents = rounded.checked_mul(Decimal::from(MINOR_PER_MAJOR))?;
        cents.to_i64().map(Money)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns the exact decimal value with two places (`500.00`).
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use tariff_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).to_decimal(), Decimal::new(1099, 2));
    /// ```
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, MONEY_SCALE)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain two-decimal rendering, no currency symbol (single-currency system).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.units().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.units(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(50000)), "500.00");
        assert_eq!(format!("{}", Money::from_cents(5)), "0.05");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-5.50");
        assert_eq!(format!("{}", Money::zero()), "0.00");
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(Money::from_decimal_rounded(dec("0.124")).unwrap().cents(), 12);
        assert_eq!(Money::from_decimal_rounded(dec("0.125")).unwrap().cents(), 13);
        assert_eq!(Money::from_decimal_rounded(dec("1234.565")).unwrap().cents(), 123457);
        assert_eq!(Money::from_decimal_rounded(dec("2.5")).unwrap().cents(), 250);
    }

    #[test]
    fn test_whole_amounts_keep_their_value() {
        // 10000 × 0.05 has scale 2 already; 500 with scale 0 must not shrink
        assert_eq!(Money::from_decimal_rounded(dec("500.00")).unwrap().cents(), 50000);
        assert_eq!(Money::from_decimal_rounded(dec("500")).unwrap().cents(), 50000);
    }

    #[test]
    fn test_overflow_is_reported() {
        assert!(Money::from_decimal_rounded(Decimal::MAX).is_none());
    }

    #[test]
    fn test_to_decimal_is_exact() {
        let cost = Money::from_cents(70000);
        assert_eq!(cost.to_decimal(), dec("700.00"));
        assert!(!cost.is_zero());
    }
}
