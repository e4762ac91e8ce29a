//! # Money Module
//!
//! Provides the `Money` type for rupee amounts.
//!
//! ## Why Exact Decimals?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE GST SPLIT PROBLEM                                                  │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    130 × 2.5% = 3.2500000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  With integer paise:                                                    │
//! │    ₹0.25 at 2.5% = 0.625 paise → rounded per line, totals drift        │
//! │                                                                         │
//! │  OUR SOLUTION: Exact Decimal Rupees                                     │
//! │    Intermediate CGST/SGST amounts keep every digit, so                  │
//! │    CGST + SGST == IGST holds exactly. Rounding to paise happens once,   │
//! │    when an order is finalized or a document is printed.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cafe_core::money::Money;
//!
//! let price = Money::from_paise(12050); // ₹120.50
//! let line_total: Money = price * 2;           // ₹241.00
//! assert_eq!(line_total.paise(), 24100);
//! assert_eq!(line_total.to_string(), "₹241.00");
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;
use crate::CURRENCY_SYMBOL;

/// Decimal places kept once an amount is rounded (paise).
pub const MONEY_SCALE: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A rupee amount held as an exact decimal.
///
/// ## Design Decisions
/// - **Decimal (signed)**: negative values flow through arithmetic untouched
/// - **Unrounded until asked**: `rounded()` and `paise()` are the only places
///   precision is dropped
/// - **Serialized as a decimal string** (`"2.5"`), so JSON clients never see
///   a float
///
/// ## Where Money is Used
/// ```text
/// MenuItem.price_paise ──► LineItem.unit_price ──► LineItem.total_price
///                                                        │
///                         compute_tax(rate, regime) ◄────┘
///                                │
///                                ▼
///                  TaxBreakdown { subtotal, cgst, sgst, igst, total }
///                                │
///                   rounded() ───┴──► Order row (paise) ──► Receipt "₹105.00"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Zero rupees.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Creates a Money value from paise (1/100 rupee).
    ///
    /// ## Example
    /// ```rust
    /// use cafe_core::money::Money;
    ///
    /// let price = Money::from_paise(9950); // ₹99.50
    /// assert_eq!(price.paise(), 9950);
    /// ```
    #[inline]
    pub fn from_paise(paise: i64) -> Self {
        Money(Decimal::new(paise, MONEY_SCALE))
    }

    /// Creates a Money value from whole rupees.
    #[inline]
    pub fn from_rupees(rupees: i64) -> Self {
        Money(Decimal::from(rupees))
    }

    /// Wraps an arbitrary decimal rupee amount.
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// The exact rupee amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Rounds to paise, half away from zero (₹0.125 → ₹0.13).
    pub fn rounded(&self) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// The amount in paise, rounded half away from zero.
    ///
    /// Saturates at the `i64` range; no realistic bill gets there.
    pub fn paise(&self) -> i64 {
        let paise = (self.rounded().0 * Decimal::ONE_HUNDRED).trunc();
        paise.to_i64().unwrap_or(if paise.is_sign_negative() {
            i64::MIN
        } else {
            i64::MAX
        })
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    #[inline]
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use cafe_core::money::Money;
    ///
    /// let unit_price = Money::from_rupees(50);
    /// assert_eq!(unit_price.multiply_quantity(2), Money::from_rupees(100));
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * Decimal::from(qty))
    }

    /// Applies a percentage rate exactly: `amount × bps / 10000`.
    ///
    /// ## Example
    /// ```rust
    /// use cafe_core::money::Money;
    /// use cafe_core::types::TaxRate;
    ///
    /// let tax = Money::from_rupees(30).apply_rate(TaxRate::from_bps(1800));
    /// assert_eq!(tax, Money::from_paise(540)); // 18% of ₹30
    /// ```
    pub fn apply_rate(&self, rate: TaxRate) -> Self {
        Money(self.0 * Decimal::from(rate.bps()) / Decimal::from(10_000u32))
    }

    /// Exactly half of this amount (used for the CGST/SGST split).
    pub fn half(&self) -> Self {
        Money(self.0 / Decimal::from(2u8))
    }

    /// `self` as a percentage of `whole`, or zero when `whole` is zero.
    pub fn percentage_of(&self, whole: Money) -> Decimal {
        if whole.is_zero() {
            Decimal::ZERO
        } else {
            self.0 / whole.0 * Decimal::ONE_HUNDRED
        }
    }

    /// `self` divided evenly across `count`, or zero when `count` is zero.
    pub fn average_over(&self, count: usize) -> Self {
        if count == 0 {
            Money::zero()
        } else {
            Money(self.0 / Decimal::from(count as u64))
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the amount rounded to paise with the rupee sign: `₹105.00`,
/// `-₹5.50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.rounded();
        let sign = if rounded.is_negative() { "-" } else { "" };
        write!(f, "{}{}{:.2}", sign, CURRENCY_SYMBOL, rounded.0.abs())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Serialize::serialize(&self.0.normalize(), serializer)
    }
}

/// Accepts both `"12.50"` and `12.5`.
impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <Decimal as Deserialize>::deserialize(deserializer).map(Money)
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

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        self.multiply_quantity(i64::from(qty))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paise() {
        let money = Money::from_paise(10999);
        assert_eq!(money.paise(), 10999);
        assert_eq!(money, Money::from_decimal(Decimal::new(10999, 2)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_paise(10999).to_string(), "₹109.99");
        assert_eq!(Money::from_rupees(5).to_string(), "₹5.00");
        assert_eq!(Money::from_paise(-550).to_string(), "-₹5.50");
        assert_eq!(Money::zero().to_string(), "₹0.00");
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        let amount = Money::from_decimal(Decimal::new(125, 3)); // ₹0.125
        assert_eq!(amount.paise(), 13);
        assert_eq!((-amount).paise(), -13);

        let amount = Money::from_decimal(Decimal::new(1234, 4)); // ₹0.1234
        assert_eq!(amount.rounded(), Money::from_paise(12));
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_rupees(10);
        let b = Money::from_rupees(5);

        assert_eq!(a + b, Money::from_rupees(15));
        assert_eq!(a - b, Money::from_rupees(5));
        assert_eq!(a * 3, Money::from_rupees(30));
        assert_eq!(-a, Money::from_rupees(-10));
    }

    #[test]
    fn test_apply_rate_is_exact() {
        let tax = Money::from_rupees(100).apply_rate(TaxRate::from_bps(500));
        assert_eq!(tax, Money::from_rupees(5));

        // 2.5% of ₹0.25 keeps sub-paisa precision
        let tax = Money::from_paise(25).apply_rate(TaxRate::from_bps(250));
        assert_eq!(tax.amount(), Decimal::new(625, 5));
        assert_eq!(tax.half() + tax.half(), tax);
    }

    #[test]
    fn test_percentage_and_average_guard_zero() {
        assert_eq!(Money::from_rupees(10).percentage_of(Money::zero()), Decimal::ZERO);
        assert_eq!(
            Money::from_rupees(25).percentage_of(Money::from_rupees(100)),
            Decimal::from(25)
        );
        assert_eq!(Money::from_rupees(10).average_over(0), Money::zero());
        assert_eq!(Money::from_rupees(10).average_over(4), Money::from_paise(250));
    }

    #[test]
    fn test_sum() {
        let items = vec![Money::from_paise(150), Money::from_paise(250)];
        let total: Money = items.iter().sum();
        assert_eq!(total, Money::from_rupees(4));
    }

    #[test]
    fn test_serde_decimal_string() {
        let json = serde_json::to_string(&Money::from_paise(250)).unwrap();
        assert_eq!(json, "\"2.5\"");

        let parsed: Money = serde_json::from_str("\"12.50\"").unwrap();
        assert_eq!(parsed, Money::from_paise(1250));
        let parsed: Money = serde_json::from_str("12.5").unwrap();
        assert_eq!(parsed, Money::from_paise(1250));
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_paise(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs(), Money::from_paise(100));
    }
}
