//! # GST Tax Engine
//!
//! Computes Indian Goods and Services Tax on a taxable amount.
//!
//! ## Regimes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  subtotal = ₹100, rate = 5%                                             │
//! │                                                                         │
//! │  CgstSgst (intra-state)            Igst (inter-state)                   │
//! │  ───────────────────────           ───────────────────────              │
//! │  CGST  2.5%  =  ₹2.50              CGST        ₹0.00                    │
//! │  SGST  2.5%  =  ₹2.50              SGST        ₹0.00                    │
//! │  IGST        =  ₹0.00              IGST  5% =  ₹5.00                    │
//! │  Total       = ₹105.00             Total     = ₹105.00                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function here is pure and total: there are no error conditions,
//! and a negative subtotal (a refund line) passes straight through the
//! arithmetic.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{TaxRate, TaxRegime};

/// Rate applied when nothing more specific is known (restaurant service).
pub const DEFAULT_GST_RATE: TaxRate = TaxRate::from_bps(500);

// =============================================================================
// GST Categories
// =============================================================================

/// Common slabs a cafe menu falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum GstCategory {
    FoodAndBeverages,
    Alcohol,
    LuxuryItems,
}

impl GstCategory {
    /// Default rate for the slab: 5%, 18% and 28%.
    pub const fn default_rate(&self) -> TaxRate {
        match self {
            GstCategory::FoodAndBeverages => TaxRate::from_bps(500),
            GstCategory::Alcohol => TaxRate::from_bps(1800),
            GstCategory::LuxuryItems => TaxRate::from_bps(2800),
        }
    }
}

// =============================================================================
// Tax Breakdown
// =============================================================================

/// Result of applying GST to a taxable amount.
///
/// Only the components of one regime are ever non-zero, and
/// `total == subtotal + cgst + sgst + igst` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxBreakdown {
    pub subtotal: Money,
    pub cgst: Money,
    pub sgst: Money,
    pub igst: Money,
    pub total: Money,
}

impl TaxBreakdown {
    pub fn zero() -> Self {
        Self::default()
    }

    /// CGST + SGST + IGST.
    pub fn tax_total(&self) -> Money {
        self.cgst + self.sgst + self.igst
    }

    /// Rounds each component to paise and recomputes the total from the
    /// rounded parts, so the sum invariant survives rounding.
    pub fn rounded(&self) -> Self {
        let subtotal = self.subtotal.rounded();
        let cgst = self.cgst.rounded();
        let sgst = self.sgst.rounded();
        let igst = self.igst.rounded();
        TaxBreakdown {
            subtotal,
            cgst,
            sgst,
            igst,
            total: subtotal + cgst + sgst + igst,
        }
    }

    /// Which regime produced this breakdown. A zero-tax breakdown reads as
    /// the split regime.
    pub fn regime(&self) -> TaxRegime {
        if self.igst.is_zero() {
            TaxRegime::CgstSgst
        } else {
            TaxRegime::Igst
        }
    }
}

/// Component-wise sum, used to fold per-item breakdowns into an order.
impl Add for TaxBreakdown {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        TaxBreakdown {
            subtotal: self.subtotal + other.subtotal,
            cgst: self.cgst + other.cgst,
            sgst: self.sgst + other.sgst,
            igst: self.igst + other.igst,
            total: self.total + other.total,
        }
    }
}

impl AddAssign for TaxBreakdown {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

// =============================================================================
// Computation
// =============================================================================

/// Applies `rate` to `subtotal` under `regime`.
///
/// ## Example
/// ```rust
/// use cafe_core::gst::compute_tax;
/// use cafe_core::{Money, TaxRate, TaxRegime};
///
/// let igst = compute_tax(Money::from_rupees(100), TaxRate::from_bps(500), TaxRegime::Igst);
/// assert_eq!(igst.igst, Money::from_rupees(5));
/// assert_eq!(igst.cgst, Money::zero());
/// assert_eq!(igst.total, Money::from_rupees(105));
/// ```
pub fn compute_tax(subtotal: Money, rate: TaxRate, regime: TaxRegime) -> TaxBreakdown {
    let full = subtotal.apply_rate(rate);

    let (cgst, sgst, igst) = match regime {
        TaxRegime::Igst => (Money::zero(), Money::zero(), full),
        TaxRegime::CgstSgst => {
            let half = full.half();
            (half, half, Money::zero())
        }
    };

    TaxBreakdown {
        subtotal,
        cgst,
        sgst,
        igst,
        total: subtotal + cgst + sgst + igst,
    }
}

/// [`compute_tax`] at the 5% split default.
pub fn compute_default_tax(subtotal: Money) -> TaxBreakdown {
    compute_tax(subtotal, DEFAULT_GST_RATE, TaxRegime::CgstSgst)
}

/// GST on a single menu line, without the regime split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemGst {
    pub subtotal: Money,
    pub gst_amount: Money,
    pub total: Money,
}

/// Line-level GST: `unit_price × quantity`, taxed at `rate`.
///
/// ## Example
/// ```rust
/// use cafe_core::gst::item_gst;
/// use cafe_core::{Money, TaxRate};
///
/// let line = item_gst(Money::from_rupees(50), 2, TaxRate::from_bps(500));
/// assert_eq!(line.subtotal, Money::from_rupees(100));
/// assert_eq!(line.gst_amount, Money::from_rupees(5));
/// ```
pub fn item_gst(unit_price: Money, quantity: i64, rate: TaxRate) -> ItemGst {
    let subtotal = unit_price.multiply_quantity(quantity);
    let gst_amount = subtotal.apply_rate(rate);
    ItemGst {
        subtotal,
        gst_amount,
        total: subtotal + gst_amount,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    const FIVE_PERCENT: TaxRate = TaxRate::from_bps(500);

    #[test]
    fn test_split_regime_on_hundred() {
        let result = compute_tax(Money::from_rupees(100), FIVE_PERCENT, TaxRegime::CgstSgst);
        assert_eq!(result.subtotal, Money::from_rupees(100));
        assert_eq!(result.cgst, Money::from_paise(250));
        assert_eq!(result.sgst, Money::from_paise(250));
        assert_eq!(result.igst, Money::zero());
        assert_eq!(result.total, Money::from_rupees(105));
    }

    #[test]
    fn test_igst_regime_on_hundred() {
        let result = compute_tax(Money::from_rupees(100), FIVE_PERCENT, TaxRegime::Igst);
        assert_eq!(result.cgst, Money::zero());
        assert_eq!(result.sgst, Money::zero());
        assert_eq!(result.igst, Money::from_rupees(5));
        assert_eq!(result.total, Money::from_rupees(105));
    }

    #[test]
    fn test_regimes_agree_on_total() {
        let amounts = [0, 1, 99, 12_345, 999_999];
        let rates = [0, 250, 500, 1200, 1800, 2800, 10_000];

        for paise in amounts {
            for bps in rates {
                let subtotal = Money::from_paise(paise);
                let rate = TaxRate::from_bps(bps);
                let split = compute_tax(subtotal, rate, TaxRegime::CgstSgst);
                let igst = compute_tax(subtotal, rate, TaxRegime::Igst);

                assert_eq!(split.total, igst.total, "{paise} paise at {bps} bps");
                assert_eq!(split.cgst, split.sgst);
                assert_eq!(split.cgst + split.sgst, igst.igst);
            }
        }
    }

    #[test]
    fn test_odd_paise_split_stays_exact() {
        // 2.5% of ₹0.01 is a fraction of a paisa
        let split = compute_tax(Money::from_paise(1), FIVE_PERCENT, TaxRegime::CgstSgst);
        assert_eq!(split.cgst.amount(), Decimal::new(25, 5));
        assert_eq!(split.total, split.subtotal + split.tax_total());
    }

    #[test]
    fn test_negative_subtotal_passes_through() {
        let result = compute_tax(Money::from_rupees(-100), FIVE_PERCENT, TaxRegime::Igst);
        assert_eq!(result.igst, Money::from_rupees(-5));
        assert_eq!(result.total, Money::from_rupees(-105));
    }

    #[test]
    fn test_default_tax() {
        let result = compute_default_tax(Money::from_rupees(200));
        assert_eq!(result.cgst, Money::from_rupees(5));
        assert_eq!(result.total, Money::from_rupees(210));
    }

    #[test]
    fn test_category_default_rates() {
        assert_eq!(GstCategory::FoodAndBeverages.default_rate().bps(), 500);
        assert_eq!(GstCategory::Alcohol.default_rate().bps(), 1800);
        assert_eq!(GstCategory::LuxuryItems.default_rate().bps(), 2800);
    }

    #[test]
    fn test_rounded_keeps_sum_invariant() {
        // ₹0.35 at 5% split → 0.00875 each half
        let result = compute_tax(Money::from_paise(35), FIVE_PERCENT, TaxRegime::CgstSgst);
        let rounded = result.rounded();
        assert_eq!(rounded.cgst, Money::from_paise(1));
        assert_eq!(rounded.sgst, Money::from_paise(1));
        assert_eq!(rounded.total, Money::from_paise(37));
        assert_eq!(
            rounded.total,
            rounded.subtotal + rounded.cgst + rounded.sgst + rounded.igst
        );
    }

    #[test]
    fn test_item_gst() {
        let line = item_gst(Money::from_rupees(30), 1, TaxRate::from_bps(1800));
        assert_eq!(line.subtotal, Money::from_rupees(30));
        assert_eq!(line.gst_amount, Money::from_paise(540));
        assert_eq!(line.total, Money::from_paise(3540));
    }
}
