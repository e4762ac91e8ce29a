//! # Domain Types
//!
//! Core records used throughout Cafe POS.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    MenuItem     │   │      Order      │   │   OrderItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  order_id (FK)  │       │
//! │  │  name           │   │  invoice_number │   │  name snapshot  │       │
//! │  │  price_paise    │   │  status         │   │  unit_price     │       │
//! │  │  tax_rate_bps   │   │  tax_regime     │   │  tax_rate_bps   │       │
//! │  └─────────────────┘   │  cgst/sgst/igst │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │   TaxRegime     │   │  OrderStatus    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  CgstSgst       │   │  Pending        │       │
//! │  │  500 = 5%       │   │  Igst           │   │  Preparing      │       │
//! │  └─────────────────┘   └─────────────────┘   │  Completed      │       │
//! │                                              │  Cancelled      │       │
//! │  Back office: Category, InventoryItem,       └─────────────────┘       │
//! │  DiningTable, User, EmployeeShift, Expense, Setting                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Amounts are stored as integer paise on records and lifted into
//! [`Money`] through accessor methods.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::gst::TaxBreakdown;
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// GST rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01%. 500 bps = 5% (restaurant service), 1800 bps = 18%.
/// Being unsigned, a negative rate simply cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for config and seed data).
    ///
    /// Negative inputs clamp to zero.
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round().max(0.0) as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as an exact percentage (`500` → `5`).
    pub fn percentage(&self) -> Decimal {
        Decimal::new(i64::from(self.0), 2).normalize()
    }

    /// Half the rate as a percentage, the CGST and SGST share (`500` → `2.5`).
    pub fn half_percentage(&self) -> Decimal {
        (Decimal::new(i64::from(self.0), 2) / Decimal::from(2u8)).normalize()
    }

    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

/// The restaurant-service rate of 5%.
impl Default for TaxRate {
    fn default() -> Self {
        crate::gst::DEFAULT_GST_RATE
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percentage())
    }
}

// =============================================================================
// Tax Regime
// =============================================================================

/// How GST is levied on an order.
///
/// ```text
/// intra-state sale ──► CgstSgst: half to the centre, half to the state
/// inter-state sale ──► Igst:     the full rate as one integrated levy
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TaxRegime {
    #[default]
    #[serde(alias = "split")]
    CgstSgst,
    Igst,
}

impl TaxRegime {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TaxRegime::CgstSgst => "cgst_sgst",
            TaxRegime::Igst => "igst",
        }
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Lifecycle of an order.
///
/// ```text
/// Pending ──► Preparing ──► Completed ──► Cancelled
///    │            │                          ▲
///    └────────────┴──────────────────────────┘
/// ```
/// Only pending and preparing orders accept line item changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order is open; items may be added.
    #[default]
    Pending,
    /// Sent to the kitchen, still editable.
    Preparing,
    /// Paid; totals are frozen.
    Completed,
    /// Voided.
    Cancelled,
}

impl OrderStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Whether line items may still change.
    pub const fn is_editable(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Preparing)
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Preparing)
                | (Pending, Completed)
                | (Preparing, Completed)
                | (Pending, Cancelled)
                | (Preparing, Cancelled)
                | (Completed, Cancelled)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Upi,
    Other,
}

impl PaymentMethod {
    /// Canonical listing order on reports.
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::Upi,
        PaymentMethod::Other,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Upi => "upi",
            PaymentMethod::Other => "other",
        }
    }

    /// Human label for reports ("Cash", "UPI").
    pub const fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::Upi => "UPI",
            PaymentMethod::Other => "Other",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Expense Category
// =============================================================================

#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Inventory,
    Salary,
    Rent,
    Utilities,
    Equipment,
    Maintenance,
    Marketing,
    #[default]
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 8] = [
        ExpenseCategory::Inventory,
        ExpenseCategory::Salary,
        ExpenseCategory::Rent,
        ExpenseCategory::Utilities,
        ExpenseCategory::Equipment,
        ExpenseCategory::Maintenance,
        ExpenseCategory::Marketing,
        ExpenseCategory::Other,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Inventory => "inventory",
            ExpenseCategory::Salary => "salary",
            ExpenseCategory::Rent => "rent",
            ExpenseCategory::Utilities => "utilities",
            ExpenseCategory::Equipment => "equipment",
            ExpenseCategory::Maintenance => "maintenance",
            ExpenseCategory::Marketing => "marketing",
            ExpenseCategory::Other => "other",
        }
    }
}

// =============================================================================
// User Role
// =============================================================================

#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Manager,
    #[default]
    Staff,
    Cashier,
}

impl UserRole {
    pub const fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Manager => "manager",
            UserRole::Staff => "staff",
            UserRole::Cashier => "cashier",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Menu
// =============================================================================

/// A menu section ("Hot Beverages", "Snacks").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// A dish or drink that can be put on an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct MenuItem {
    pub id: i64,

    /// Display name, copied onto the order line when ordered.
    pub name: String,

    pub description: Option<String>,

    /// Price in paise before GST.
    pub price_paise: i64,

    pub category_id: Option<i64>,

    /// GST rate in basis points (500 = 5%).
    pub tax_rate_bps: u32,

    /// Whether the kitchen is currently serving it.
    pub available: bool,

    pub image_url: Option<String>,

    pub stock_quantity: i64,
}

impl MenuItem {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_paise(self.price_paise)
    }

    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }
}

// =============================================================================
// Inventory
// =============================================================================

/// A stock-room ingredient (milk, coffee beans) tracked by unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InventoryItem {
    pub id: i64,
    pub name: String,
    /// Quantity on hand, in `unit`s; fractional for weights and volumes.
    pub quantity: f64,
    pub unit: String,
    /// Reorder point; `None` disables the low-stock alert.
    pub alert_threshold: Option<f64>,
    /// Purchase cost per unit in paise.
    pub cost_paise: Option<i64>,
}

impl InventoryItem {
    /// At or below the reorder point.
    pub fn is_low_stock(&self) -> bool {
        self.alert_threshold
            .map(|threshold| self.quantity <= threshold)
            .unwrap_or(false)
    }
}

// =============================================================================
// Dining Table
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct DiningTable {
    pub id: i64,
    pub name: String,
    pub capacity: Option<i64>,
    pub occupied: bool,
}

// =============================================================================
// Order
// =============================================================================

/// An order, open or finalized.
///
/// Tax components are stored rounded to paise and satisfy
/// `total = subtotal + cgst + sgst + igst` once the order is completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Order {
    pub id: i64,
    pub table_id: Option<i64>,
    /// Staff member who took the order.
    pub user_id: Option<i64>,
    pub status: OrderStatus,
    pub tax_regime: TaxRegime,
    pub subtotal_paise: i64,
    pub cgst_paise: i64,
    pub sgst_paise: i64,
    pub igst_paise: i64,
    pub total_paise: i64,
    pub payment_method: Option<PaymentMethod>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    /// Buyer's GSTIN for B2B invoices.
    pub customer_gstin: Option<String>,
    /// Assigned when the order is finalized.
    pub invoice_number: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Order {
    /// The frozen totals as stored on the order.
    pub fn tax_breakdown(&self) -> TaxBreakdown {
        TaxBreakdown {
            subtotal: Money::from_paise(self.subtotal_paise),
            cgst: Money::from_paise(self.cgst_paise),
            sgst: Money::from_paise(self.sgst_paise),
            igst: Money::from_paise(self.igst_paise),
            total: Money::from_paise(self.total_paise),
        }
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_paise(self.total_paise)
    }

    /// Total GST collected on this order.
    pub fn tax_total(&self) -> Money {
        Money::from_paise(self.cgst_paise + self.sgst_paise + self.igst_paise)
    }

    /// Invoice number when assigned, otherwise `#<id>`.
    pub fn display_number(&self) -> String {
        match &self.invoice_number {
            Some(invoice) if !invoice.is_empty() => invoice.clone(),
            _ => format!("#{}", self.id),
        }
    }
}

/// A line on an order, with menu data frozen at the time it was added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    /// `None` once the menu item has been deleted.
    pub menu_item_id: Option<i64>,
    /// Menu item name at time of order (frozen).
    pub name: String,
    pub quantity: i64,
    /// Unit price in paise at time of order (frozen).
    pub unit_price_paise: i64,
    /// `unit_price × quantity`, before tax.
    pub total_price_paise: i64,
    /// GST rate at time of order (frozen).
    pub tax_rate_bps: u32,
    /// Kitchen note ("less sugar").
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl OrderItem {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_paise(self.unit_price_paise)
    }

    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_paise(self.total_price_paise)
    }

    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }
}

// =============================================================================
// Staff & Back Office
// =============================================================================

/// A member of staff. Shifts, orders and expenses point back at one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    pub id: i64,
    pub name: String,
    /// Unique login handle.
    pub username: String,
    pub role: UserRole,
    /// Inactive staff keep their history but cannot clock in.
    pub active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// One clock-in/clock-out span for an employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct EmployeeShift {
    pub id: i64,
    pub user_id: i64,
    #[ts(as = "String")]
    pub clock_in: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub clock_out: Option<DateTime<Utc>>,
}

impl EmployeeShift {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.clock_out.is_none()
    }

    /// Length of a closed shift.
    pub fn duration(&self) -> Option<Duration> {
        self.clock_out.map(|out| out - self.clock_in)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Expense {
    pub id: i64,
    pub description: String,
    /// Always positive.
    pub amount_paise: i64,
    pub category: ExpenseCategory,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub user_id: Option<i64>,
    pub notes: Option<String>,
    pub receipt_url: Option<String>,
}

impl Expense {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_paise(self.amount_paise)
    }
}

/// A key/value row from the settings table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Setting {
    pub id: i64,
    pub key: String,
    pub value: Option<String>,
    /// Hint for editors: "string", "number", "boolean".
    pub value_type: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn order() -> Order {
        Order {
            id: 42,
            table_id: None,
            user_id: None,
            status: OrderStatus::Completed,
            tax_regime: TaxRegime::CgstSgst,
            subtotal_paise: 10000,
            cgst_paise: 250,
            sgst_paise: 250,
            igst_paise: 0,
            total_paise: 10500,
            payment_method: Some(PaymentMethod::Upi),
            customer_name: None,
            customer_phone: None,
            customer_gstin: None,
            invoice_number: None,
            created_at: Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap(),
            completed_at: None,
        }
    }

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(1800);
        assert_eq!(rate.bps(), 1800);
        assert_eq!(rate.percentage(), Decimal::from(18));
        assert_eq!(rate.half_percentage(), Decimal::from(9));
        assert_eq!(TaxRate::from_bps(500).half_percentage(), Decimal::new(25, 1));
    }

    #[test]
    fn test_tax_rate_from_percentage() {
        assert_eq!(TaxRate::from_percentage(5.0).bps(), 500);
        assert_eq!(TaxRate::from_percentage(12.5).bps(), 1250);
        assert_eq!(TaxRate::from_percentage(-3.0).bps(), 0);
    }

    #[test]
    fn test_tax_rate_default_and_display() {
        assert_eq!(TaxRate::default().bps(), 500);
        assert_eq!(TaxRate::from_bps(500).to_string(), "5%");
        assert_eq!(TaxRate::from_bps(250).to_string(), "2.5%");
    }

    #[test]
    fn test_regime_serde_names() {
        assert_eq!(serde_json::to_string(&TaxRegime::CgstSgst).unwrap(), "\"cgst_sgst\"");
        let parsed: TaxRegime = serde_json::from_str("\"split\"").unwrap();
        assert_eq!(parsed, TaxRegime::CgstSgst);
        assert_eq!(TaxRegime::default(), TaxRegime::CgstSgst);
    }

    #[test]
    fn test_order_status_transitions() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Completed));
        assert!(OrderStatus::Completed.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Preparing.is_editable());
        assert!(!OrderStatus::Completed.is_editable());
    }

    #[test]
    fn test_order_display_number_falls_back_to_id() {
        let mut order = order();
        assert_eq!(order.display_number(), "#42");

        order.invoice_number = Some("INV-20261019-00042".to_string());
        assert_eq!(order.display_number(), "INV-20261019-00042");
    }

    #[test]
    fn test_order_breakdown_satisfies_total() {
        let order = order();
        let breakdown = order.tax_breakdown();
        assert_eq!(
            breakdown.total,
            breakdown.subtotal + breakdown.cgst + breakdown.sgst + breakdown.igst
        );
        assert_eq!(order.tax_total(), Money::from_rupees(5));
    }

    #[test]
    fn test_inventory_low_stock() {
        let mut item = InventoryItem {
            id: 1,
            name: "Milk".to_string(),
            quantity: 2.0,
            unit: "l".to_string(),
            alert_threshold: Some(5.0),
            cost_paise: Some(6000),
        };
        assert!(item.is_low_stock());

        item.quantity = 10.0;
        assert!(!item.is_low_stock());

        item.alert_threshold = None;
        item.quantity = 0.0;
        assert!(!item.is_low_stock());
    }

    #[test]
    fn test_user_role_names() {
        assert_eq!(UserRole::default(), UserRole::Staff);
        assert_eq!(serde_json::to_string(&UserRole::Cashier).unwrap(), "\"cashier\"");
        let parsed: UserRole = serde_json::from_str("\"manager\"").unwrap();
        assert_eq!(parsed, UserRole::Manager);
        assert_eq!(UserRole::Admin.to_string(), "admin");
    }

    #[test]
    fn test_shift_duration() {
        let clock_in = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
        let mut shift = EmployeeShift {
            id: 1,
            user_id: 7,
            clock_in,
            clock_out: None,
        };
        assert!(shift.is_active());
        assert_eq!(shift.duration(), None);

        shift.clock_out = Some(clock_in + Duration::hours(8));
        assert_eq!(shift.duration(), Some(Duration::hours(8)));
    }
}
