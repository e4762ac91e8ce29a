//! # Sales Reports
//!
//! Folds completed orders and expenses for a date range into the figures
//! shown on the back-office report.
//!
//! ```text
//! orders (completed, in range) ──┬──► total sales, order count, GST collected
//!                                └──► per payment method totals
//! expenses (in range) ───────────┬──► total expenses
//!                                └──► per category totals
//!                    sales − expenses = net profit
//! ```
//!
//! Pending and cancelled orders never count towards sales.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Expense, ExpenseCategory, Order, OrderStatus, PaymentMethod};

// =============================================================================
// Period & Range
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Custom,
}

impl ReportPeriod {
    pub const fn label(&self) -> &'static str {
        match self {
            ReportPeriod::Daily => "Daily",
            ReportPeriod::Weekly => "Weekly",
            ReportPeriod::Monthly => "Monthly",
            ReportPeriod::Custom => "Custom",
        }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Half-open time range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DateRange {
    #[ts(as = "String")]
    pub start: DateTime<Utc>,
    #[ts(as = "String")]
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        DateRange { start, end }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }
}

// =============================================================================
// Report Records
// =============================================================================

/// One row of the order listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReportOrder {
    pub id: i64,
    pub invoice_number: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub customer_name: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub tax: Money,
    pub total: Money,
}

impl ReportOrder {
    /// Invoice number when assigned, otherwise `#<id>`.
    pub fn display_number(&self) -> String {
        match &self.invoice_number {
            Some(invoice) if !invoice.is_empty() => invoice.clone(),
            _ => format!("#{}", self.id),
        }
    }
}

impl From<&Order> for ReportOrder {
    fn from(order: &Order) -> Self {
        ReportOrder {
            id: order.id,
            invoice_number: order.invoice_number.clone(),
            created_at: order.created_at,
            customer_name: order.customer_name.clone(),
            payment_method: order.payment_method,
            tax: order.tax_total(),
            total: order.total(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentMethodTotal {
    pub method: PaymentMethod,
    /// Display label ("Cash", "UPI").
    pub name: String,
    pub value: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExpenseCategoryTotal {
    pub category: ExpenseCategory,
    pub value: Money,
}

/// Everything the report page and the printable report need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesReport {
    pub period: ReportPeriod,
    pub range: DateRange,
    pub total_sales: Money,
    pub total_orders: usize,
    pub total_tax: Money,
    pub average_order_value: Money,
    pub sales_by_payment_method: Vec<PaymentMethodTotal>,
    pub total_expenses: Money,
    pub expenses_by_category: Vec<ExpenseCategoryTotal>,
    /// Sales minus expenses; negative in a loss-making period.
    pub net_profit: Money,
    pub orders: Vec<ReportOrder>,
}

impl SalesReport {
    /// Aggregates the completed orders and expenses that fall in `range`.
    ///
    /// Payment methods and expense categories are listed in their canonical
    /// order and only when they have at least one entry.
    pub fn build(
        period: ReportPeriod,
        range: DateRange,
        orders: &[Order],
        expenses: &[Expense],
    ) -> Self {
        let mut completed: Vec<&Order> = orders
            .iter()
            .filter(|o| o.status == OrderStatus::Completed && range.contains(o.created_at))
            .collect();
        completed.sort_by_key(|o| (o.created_at, o.id));

        let total_sales: Money = completed.iter().map(|o| o.total()).sum();
        let total_tax: Money = completed.iter().map(|o| o.tax_total()).sum();

        let sales_by_payment_method = PaymentMethod::ALL
            .iter()
            .filter_map(|method| {
                let mut matching = completed
                    .iter()
                    .filter(|o| o.payment_method == Some(*method))
                    .peekable();
                matching.peek()?;
                Some(PaymentMethodTotal {
                    method: *method,
                    name: method.label().to_string(),
                    value: matching.map(|o| o.total()).sum(),
                })
            })
            .collect();

        let in_range: Vec<&Expense> = expenses.iter().filter(|e| range.contains(e.date)).collect();
        let total_expenses: Money = in_range.iter().map(|e| e.amount()).sum();

        let expenses_by_category = ExpenseCategory::ALL
            .iter()
            .filter_map(|category| {
                let mut matching = in_range
                    .iter()
                    .filter(|e| e.category == *category)
                    .peekable();
                matching.peek()?;
                Some(ExpenseCategoryTotal {
                    category: *category,
                    value: matching.map(|e| e.amount()).sum(),
                })
            })
            .collect();

        SalesReport {
            period,
            range,
            total_sales,
            total_orders: completed.len(),
            total_tax,
            average_order_value: total_sales.average_over(completed.len()),
            sales_by_payment_method,
            total_expenses,
            expenses_by_category,
            net_profit: total_sales - total_expenses,
            orders: completed.into_iter().map(ReportOrder::from).collect(),
        }
    }

    /// Share of total sales taken by `value`, in percent; zero when there
    /// were no sales.
    pub fn sales_share(&self, value: Money) -> Decimal {
        value.percentage_of(self.total_sales)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
