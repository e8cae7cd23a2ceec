//! # Money Module
//!
//! Integer-cent money for every amount in a cart or work order.
//!
//! ## Where Floats Are Allowed
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cart math             Money (i64 cents)        exact                   │
//! │  Operator input        "34.20" ──► parse_major ──► Money(3420)          │
//! │  Remote payload        Money(3420) ──► as_major_units ──► 34.2          │
//! │                                                                         │
//! │  Floats only exist at the payload boundary, never inside totals.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use shopfloor_core::money::Money;
//!
//! let price = Money::from_cents(1099);
//! let line = price * 3;
//! assert_eq!(line.cents(), 3297);
//! assert_eq!(Money::parse_major("34.2").unwrap().cents(), 3420);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents.
///
/// Signed so that `subtotal - discount` can be computed before clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Parses an operator-entered decimal amount such as `"34.20"`.
    ///
    /// Accepts at most two fractional digits and an optional leading `-`
    /// (sign checks belong to the caller, which reports `Negative`).
    ///
    /// ```rust
    /// use shopfloor_core::money::Money;
    ///
    /// assert_eq!(Money::parse_major("100").unwrap().cents(), 10000);
    /// assert_eq!(Money::parse_major("0.5").unwrap().cents(), 50);
    /// assert!(Money::parse_major("1.234").is_err());
    /// assert!(Money::parse_major("abc").is_err());
    /// ```
    pub fn parse_major(input: &str) -> Result<Money, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let input = input.trim();
        let (negative, digits) = match input.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, input),
        };

        let (whole, frac) = match digits.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (digits, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(invalid("expected a number"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("expected a number"));
        }
        if frac.len() > 2 {
            return Err(invalid("at most two decimal places"));
        }

        let whole_cents = if whole.is_empty() {
            0
        } else {
            whole
                .parse::<i64>()
                .ok()
                .and_then(|w| w.checked_mul(100))
                .ok_or_else(|| invalid("amount too large"))?
        };
        let frac_cents = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid("expected a number"))? * 10,
            _ => frac.parse::<i64>().map_err(|_| invalid("expected a number"))?,
        };

        let cents = whole_cents
            .checked_add(frac_cents)
            .ok_or_else(|| invalid("amount too large"))?;
        Ok(Money(if negative { -cents } else { cents }))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the value in whole currency units as a float.
    ///
    /// Only for the remote payload, which expects decimal numbers.
    #[inline]
    pub fn as_major_units(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the value, or zero if it is negative.
    #[inline]
    pub const fn floor_zero(self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            self
        }
    }

    /// Calculates tax at `rate`, rounding half-up to the cent.
    ///
    /// ```rust
    /// use shopfloor_core::money::Money;
    /// use shopfloor_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_cents(8000);
    /// assert_eq!(subtotal.calculate_tax(TaxRate::from_bps(1600)).cents(), 1280);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 so large subtotals cannot overflow before the division
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(tax_cents as i64)
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// Unchecked: cart lines are admitted through
    /// [`validate_line_amount`](crate::validation::validate_line_amount),
    /// which guarantees the product fits.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Multiplies a unit price by a quantity, `None` on overflow.
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly rendering, e.g. `$214.20`. The console formats with the
/// configured currency symbol instead.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Decimal Wire Format
// =============================================================================

/// Serde adapter for the remote API, which exchanges amounts as decimal
/// numbers (`100.5`) rather than cents.
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use shopfloor_core::money::{self, Money};
///
/// #[derive(Serialize, Deserialize)]
/// struct Line {
///     #[serde(with = "money::major_units")]
///     price: Money,
/// }
///
/// let line: Line = serde_json::from_str(r#"{"price": 12.5}"#).unwrap();
/// assert_eq!(line.price.cents(), 1250);
/// assert_eq!(serde_json::to_string(&line).unwrap(), r#"{"price":12.5}"#);
/// ```
pub mod major_units {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Money;

    pub fn serialize<S>(money: &Money, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(money.as_major_units())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Money, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        if !value.is_finite() {
            return Err(serde::de::Error::custom("amount must be a finite number"));
        }
        Ok(Money::from_cents((value * 100.0).round() as i64))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
