//! # cafe-core: Pure Business Logic for Cafe POS
//!
//! This crate holds everything a cafe till needs to know about money, GST
//! and printed documents, as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Cafe POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  cafe-server (axum HTTP API)                    │   │
//! │  │    /api/menu-items, /api/orders, /api/reports, ...              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ cafe-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌─────────┐           │   │
//! │  │   │   gst   │  │  order  │  │ report  │  │ render  │           │   │
//! │  │   │ CGST/   │  │ Draft   │  │ Sales   │  │ Receipt │           │   │
//! │  │   │ SGST/   │  │ Line    │  │ Report  │  │ Report  │           │   │
//! │  │   │ IGST    │  │ Items   │  │         │  │ HTML    │           │   │
//! │  │   └─────────┘  └─────────┘  └─────────┘  └─────────┘           │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    cafe-db (Database Layer)                     │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records (MenuItem, Order, Expense, ...)
//! - [`money`] - Exact decimal rupee amounts
//! - [`gst`] - Tax engine (CGST + SGST split, or IGST)
//! - [`order`] - Line items, per-item aggregation, the order draft
//! - [`report`] - Sales report aggregation
//! - [`settings`] - Cafe identity resolved from the settings table
//! - [`render`] - Printable HTML receipts and reports
//! - [`validation`] - Business rule validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use cafe_core::gst::compute_tax;
//! use cafe_core::{Money, TaxRate, TaxRegime};
//!
//! let breakdown = compute_tax(Money::from_rupees(100), TaxRate::from_bps(500), TaxRegime::CgstSgst);
//!
//! assert_eq!(breakdown.cgst, Money::from_paise(250));
//! assert_eq!(breakdown.sgst, Money::from_paise(250));
//! assert_eq!(breakdown.total, Money::from_rupees(105));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod gst;
pub mod money;
pub mod order;
pub mod render;
pub mod report;
pub mod settings;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use gst::{compute_tax, TaxBreakdown};
pub use money::Money;
pub use order::{aggregate, LineItem, OrderDraft};
pub use settings::CafeInfo;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct line items on a single order.
///
/// ## Business Reason
/// Prevents runaway tickets; a cafe table never orders a hundred
/// different dishes.
pub const MAX_ORDER_ITEMS: usize = 100;

/// Maximum quantity of a single line item.
///
/// ## Business Reason
/// Catches fat-finger entry (1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Rupee sign used on receipts and reports.
pub const CURRENCY_SYMBOL: &str = "₹";

/// India Standard Time, the default offset for printed dates (UTC+05:30).
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 330;
