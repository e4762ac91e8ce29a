//! # Orders
//!
//! Line items, per-item GST aggregation and the editable order draft.
//!
//! ## Aggregation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Line                Subtotal   Rate    CGST     SGST                   │
//! │  ──────────────────  ────────   ────    ─────    ─────                  │
//! │  Masala Chai   × 2    100.00     5%      2.50     2.50                  │
//! │  Cold Coffee   × 1     30.00    18%      2.70     2.70                  │
//! │  ──────────────────  ────────           ─────    ─────                  │
//! │  Order                130.00             5.20     5.20   Total 140.40   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Each line is taxed at its own rate and the components are summed. Sums
//! are exact decimals, so line order never changes the result.
//!
//! ## Draft Lifecycle
//! ```text
//! OrderDraft::new ──► add_item / update_quantity / remove_item
//!                              │
//!                              ▼
//!                   finalize(payment_method)
//!                              │
//!                              ▼
//!             FinalizedOrder { totals rounded to paise, frozen }
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::gst::{compute_tax, TaxBreakdown};
use crate::money::Money;
use crate::types::{MenuItem, OrderItem, PaymentMethod, TaxRate, TaxRegime};
use crate::validation::{validate_gstin, validate_phone, validate_quantity};
use crate::{MAX_ITEM_QUANTITY, MAX_ORDER_ITEMS};

// =============================================================================
// Line Item
// =============================================================================

/// One product line on an order, with price and rate frozen when added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Source menu item, if it still exists.
    pub menu_item_id: Option<i64>,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub tax_rate: TaxRate,
    pub notes: Option<String>,
}

impl LineItem {
    pub fn new(name: impl Into<String>, quantity: i64, unit_price: Money, tax_rate: TaxRate) -> Self {
        LineItem {
            menu_item_id: None,
            name: name.into(),
            quantity,
            unit_price,
            tax_rate,
            notes: None,
        }
    }

    /// Snapshots a menu item's name, price and rate.
    pub fn from_menu_item(item: &MenuItem, quantity: i64) -> Self {
        LineItem {
            menu_item_id: Some(item.id),
            name: item.name.clone(),
            quantity,
            unit_price: item.price(),
            tax_rate: item.tax_rate(),
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }

    /// `unit_price × quantity`, before tax.
    pub fn total_price(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// GST on this line alone.
    pub fn tax(&self, regime: TaxRegime) -> TaxBreakdown {
        compute_tax(self.total_price(), self.tax_rate, regime)
    }

    /// Lines merge when they come from the same menu item with the same
    /// frozen price, rate and kitchen note.
    fn merges_with(&self, other: &LineItem) -> bool {
        self.menu_item_id.is_some()
            && self.menu_item_id == other.menu_item_id
            && self.unit_price == other.unit_price
            && self.tax_rate == other.tax_rate
            && self.notes == other.notes
    }
}

impl From<&OrderItem> for LineItem {
    fn from(item: &OrderItem) -> Self {
        LineItem {
            menu_item_id: item.menu_item_id,
            name: item.name.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price(),
            tax_rate: item.tax_rate(),
            notes: item.notes.clone(),
        }
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// Taxes every line at its own rate under `regime` and sums the results.
///
/// An empty slice yields an all-zero breakdown.
pub fn aggregate(items: &[LineItem], regime: TaxRegime) -> TaxBreakdown {
    items
        .iter()
        .fold(TaxBreakdown::zero(), |acc, item| acc + item.tax(regime))
}

/// [`aggregate`] under the intra-state CGST + SGST split.
pub fn aggregate_split(items: &[LineItem]) -> TaxBreakdown {
    aggregate(items, TaxRegime::CgstSgst)
}

/// The single rate shared by every line, if there is one. Receipts use it to
/// print "CGST 2.5%" instead of a bare "CGST".
pub fn uniform_rate(items: &[LineItem]) -> Option<TaxRate> {
    let first = items.first()?.tax_rate;
    items
        .iter()
        .all(|item| item.tax_rate == first)
        .then_some(first)
}

// =============================================================================
// Customer
// =============================================================================

/// Optional buyer details printed on the invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerDetails {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub gstin: Option<String>,
}

impl CustomerDetails {
    /// Trims fields, drops blanks, and checks phone and GSTIN formats.
    pub fn normalized(self) -> CoreResult<Self> {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        let details = CustomerDetails {
            name: clean(self.name),
            phone: clean(self.phone),
            gstin: clean(self.gstin).map(|g| g.to_uppercase()),
        };

        if let Some(phone) = &details.phone {
            validate_phone(phone)?;
        }
        if let Some(gstin) = &details.gstin {
            validate_gstin(gstin)?;
        }

        Ok(details)
    }
}

// =============================================================================
// Order Draft
// =============================================================================

/// An order being built at the counter.
///
/// ## Invariants
/// - Lines from the same menu item (same price, rate and note) merge
/// - Every quantity is between 1 and [`MAX_ITEM_QUANTITY`]
/// - At most [`MAX_ORDER_ITEMS`] lines
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    items: Vec<LineItem>,
    regime: TaxRegime,
    customer: CustomerDetails,
}

impl OrderDraft {
    pub fn new(regime: TaxRegime) -> Self {
        OrderDraft {
            items: Vec::new(),
            regime,
            customer: CustomerDetails::default(),
        }
    }

    /// Rebuilds a draft from lines that were already accepted (e.g. loaded
    /// from the database).
    pub fn from_items(items: Vec<LineItem>, regime: TaxRegime) -> Self {
        OrderDraft {
            items,
            regime,
            customer: CustomerDetails::default(),
        }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn regime(&self) -> TaxRegime {
        self.regime
    }

    pub fn set_regime(&mut self, regime: TaxRegime) {
        self.regime = regime;
    }

    pub fn customer(&self) -> &CustomerDetails {
        &self.customer
    }

    pub fn set_customer(&mut self, customer: CustomerDetails) -> CoreResult<()> {
        self.customer = customer.normalized()?;
        Ok(())
    }

    /// Adds a line, or raises the quantity of a matching line.
    pub fn add_item(&mut self, item: LineItem) -> CoreResult<()> {
        validate_quantity(item.quantity)?;

        if let Some(existing) = self.items.iter_mut().find(|i| i.merges_with(&item)) {
            let new_qty = existing.quantity + item.quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            existing.quantity = new_qty;
            return Ok(());
        }

        if self.items.len() >= MAX_ORDER_ITEMS {
            return Err(CoreError::OrderTooLarge {
                max: MAX_ORDER_ITEMS,
            });
        }

        self.items.push(item);
        Ok(())
    }

    /// Sets the quantity of the line at `index`; zero removes it.
    pub fn update_quantity(&mut self, index: usize, quantity: i64) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove_item(index).map(|_| ());
        }

        validate_quantity(quantity)?;

        let item = self
            .items
            .get_mut(index)
            .ok_or_else(|| CoreError::ItemNotInOrder(index.to_string()))?;
        item.quantity = quantity;
        Ok(())
    }

    pub fn remove_item(&mut self, index: usize) -> CoreResult<LineItem> {
        if index >= self.items.len() {
            return Err(CoreError::ItemNotInOrder(index.to_string()));
        }
        Ok(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Live, unrounded totals.
    pub fn totals(&self) -> TaxBreakdown {
        aggregate(&self.items, self.regime)
    }

    /// Records payment and freezes the totals, rounded to paise.
    pub fn finalize(self, payment_method: PaymentMethod) -> CoreResult<FinalizedOrder> {
        if self.items.is_empty() {
            return Err(CoreError::EmptyOrder);
        }

        let totals = self.totals().rounded();

        Ok(FinalizedOrder {
            items: self.items,
            regime: self.regime,
            customer: self.customer,
            payment_method,
            totals,
        })
    }
}

/// A paid order. Nothing on it changes after this point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FinalizedOrder {
    pub items: Vec<LineItem>,
    pub regime: TaxRegime,
    pub customer: CustomerDetails,
    pub payment_method: PaymentMethod,
    pub totals: TaxBreakdown,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn chai() -> LineItem {
        LineItem {
            menu_item_id: Some(1),
            ..LineItem::new("Masala Chai", 2, Money::from_rupees(50), TaxRate::from_bps(500))
        }
    }

    fn cold_coffee() -> LineItem {
        LineItem {
            menu_item_id: Some(2),
            ..LineItem::new("Cold Coffee", 1, Money::from_rupees(30), TaxRate::from_bps(1800))
        }
    }

    #[test]
    fn test_empty_aggregate_is_zero() {
        let result = aggregate(&[], TaxRegime::CgstSgst);
        assert_eq!(result, TaxBreakdown::zero());
        assert!(result.total.is_zero());
    }

    #[test]
    fn test_mixed_rate_split_aggregate() {
        let result = aggregate_split(&[chai(), cold_coffee()]);
        assert_eq!(result.subtotal, Money::from_rupees(130));
        assert_eq!(result.cgst, Money::from_paise(520));
        assert_eq!(result.sgst, Money::from_paise(520));
        assert_eq!(result.igst, Money::zero());
        assert_eq!(result.total, Money::from_paise(14040));
    }

    #[test]
    fn test_mixed_rate_igst_aggregate() {
        let result = aggregate(&[chai(), cold_coffee()], TaxRegime::Igst);
        assert_eq!(result.igst, Money::from_paise(1040));
        assert_eq!(result.cgst, Money::zero());
        assert_eq!(result.total, Money::from_paise(14040));
    }

    #[test]
    fn test_aggregate_ignores_order() {
        let forward = aggregate_split(&[chai(), cold_coffee()]);
        let backward = aggregate_split(&[cold_coffee(), chai()]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_uniform_rate() {
        assert_eq!(uniform_rate(&[chai(), chai()]), Some(TaxRate::from_bps(500)));
        assert_eq!(uniform_rate(&[chai(), cold_coffee()]), None);
        assert_eq!(uniform_rate(&[]), None);
    }

    #[test]
    fn test_draft_merges_same_menu_item() {
        let mut draft = OrderDraft::new(TaxRegime::CgstSgst);
        draft.add_item(chai()).unwrap();
        draft.add_item(chai()).unwrap();
        draft.add_item(cold_coffee()).unwrap();

        assert_eq!(draft.items().len(), 2);
        assert_eq!(draft.items()[0].quantity, 4);
        assert_eq!(draft.total_quantity(), 5);
    }

    #[test]
    fn test_draft_keeps_lines_with_different_notes() {
        let mut draft = OrderDraft::new(TaxRegime::CgstSgst);
        draft.add_item(chai()).unwrap();
        draft
            .add_item(chai().with_notes(Some("less sugar".to_string())))
            .unwrap();
        assert_eq!(draft.items().len(), 2);
    }

    #[test]
    fn test_draft_rejects_excess_quantity() {
        let mut draft = OrderDraft::new(TaxRegime::CgstSgst);
        let mut big = chai();
        big.quantity = 998;
        draft.add_item(big).unwrap();

        let err = draft.add_item(chai()).unwrap_err();
        assert!(matches!(err, CoreError::QuantityTooLarge { requested: 1000, .. }));

        let mut zero = cold_coffee();
        zero.quantity = 0;
        assert!(draft.add_item(zero).is_err());
    }

    #[test]
    fn test_draft_update_and_remove() {
        let mut draft = OrderDraft::new(TaxRegime::CgstSgst);
        draft.add_item(chai()).unwrap();
        draft.add_item(cold_coffee()).unwrap();

        draft.update_quantity(1, 3).unwrap();
        assert_eq!(draft.items()[1].quantity, 3);

        draft.update_quantity(0, 0).unwrap();
        assert_eq!(draft.items().len(), 1);
        assert_eq!(draft.items()[0].name, "Cold Coffee");

        assert!(draft.remove_item(5).is_err());
        draft.clear();
        assert!(draft.is_empty());
    }

    #[test]
    fn test_finalize_rounds_and_preserves_invariant() {
        let mut draft = OrderDraft::new(TaxRegime::CgstSgst);
        draft
            .add_item(LineItem::new("Cookie", 1, Money::from_paise(35), TaxRate::from_bps(500)))
            .unwrap();
        draft.add_item(chai()).unwrap();

        let order = draft.finalize(PaymentMethod::Cash).unwrap();
        let t = order.totals;
        assert_eq!(t.total, t.subtotal + t.cgst + t.sgst + t.igst);
        assert_eq!(t.cgst, t.sgst);
        assert_eq!(t.igst, Money::zero());
        assert_eq!(t.total.rounded(), t.total);
        assert_eq!(order.payment_method, PaymentMethod::Cash);
    }

    #[test]
    fn test_finalize_empty_order_fails() {
        let draft = OrderDraft::new(TaxRegime::Igst);
        assert!(matches!(
            draft.finalize(PaymentMethod::Upi),
            Err(CoreError::EmptyOrder)
        ));
    }

    #[test]
    fn test_customer_details_normalized() {
        let details = CustomerDetails {
            name: Some("  Asha ".to_string()),
            phone: Some("".to_string()),
            gstin: Some("29aabct1332l1zt".to_string()),
        }
        .normalized()
        .unwrap();

        assert_eq!(details.name.as_deref(), Some("Asha"));
        assert_eq!(details.phone, None);
        assert_eq!(details.gstin.as_deref(), Some("29AABCT1332L1ZT"));

        let bad = CustomerDetails {
            gstin: Some("NOT-A-GSTIN".to_string()),
            ..Default::default()
        };
        assert!(bad.normalized().is_err());
    }
}
