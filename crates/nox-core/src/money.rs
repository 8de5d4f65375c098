//! # Money Module
//!
//! Provides the `Money` type for monetary values in the storefront.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Catalog price "$299.99" + RGB option "$50.00" as floats:               │
//! │    299.99 + 50.00 = 349.99000000000001  ❌                              │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    29999 + 5000 = 34999 cents = $349.99  ✅                             │
//! │                                                                         │
//! │  Percentages (tax, promo codes) are basis points: 800 = 8%             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use nox_core::money::{Money, Rate};
//!
//! let price = Money::from_cents(29_999); // $299.99
//! let line = price * 2;                  // $599.98
//! let tax = line.percentage(Rate::from_bps(800));
//! assert_eq!(tax.cents(), 4_800);        // $48.00 (rounded half up)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

// =============================================================================
// Rate
// =============================================================================

/// A percentage in basis points (1 bps = 0.01%).
///
/// Used for sales tax and percentage promo codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    /// Creates a rate from basis points (800 = 8%).
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents for USD).
///
/// ## Where Money is Used
/// ```text
/// Product.base_price ──┬──► CartLineItem.unit_price ──► line total
///                      │
/// ProductOption.price ─┘
///
/// Cart.subtotal ──► promo discount ──► + shipping ──► tax ──► total
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use nox_core::money::Money;
    ///
    /// let price = Money::from_cents(29_999); // $299.99
    /// assert_eq!(price.cents(), 29_999);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-dollar portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Computes `rate` percent of this amount, rounding half up.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`. i128 prevents overflow.
    ///
    /// ## Example
    /// ```rust
    /// use nox_core::money::{Money, Rate};
    ///
    /// // 10% of $300.00
    /// let off = Money::from_cents(30_000).percentage(Rate::from_bps(1_000));
    /// assert_eq!(off.cents(), 3_000);
    /// ```
    pub fn percentage(&self, rate: Rate) -> Money {
        let cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(cents as i64)
    }

    /// Multiplies a unit price by a quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-style display: `$349.99`. Locale-aware formatting is the
/// storefront config's job.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.dollars().abs(), self.cents_part())
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
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(29_999);
        assert_eq!(money.cents(), 29_999);
        assert_eq!(money.dollars(), 299);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(34_999).to_string(), "$349.99");
        assert_eq!(Money::from_cents(500).to_string(), "$5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        // 8% of $0.50 = 4 cents exactly
        assert_eq!(Money::from_cents(50).percentage(Rate::from_bps(800)).cents(), 4);
        // 8% of $0.55 = 4.4 cents → 4
        assert_eq!(Money::from_cents(55).percentage(Rate::from_bps(800)).cents(), 4);
        // 8% of $0.57 = 4.56 cents → 5
        assert_eq!(Money::from_cents(57).percentage(Rate::from_bps(800)).cents(), 5);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_cents(15_000);
        assert_eq!(unit_price.multiply_quantity(2).cents(), 30_000);
    }
}
