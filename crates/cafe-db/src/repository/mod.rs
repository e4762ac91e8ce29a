//! # Repository Module
//!
//! Database repository implementations for Cafe POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.orders().add_item(7, &line)                                │
//! │       ▼                                                                 │
//! │  OrderRepository                                                       │
//! │  ├── create(&self, new_order)                                          │
//! │  ├── add_item(&self, order_id, line)                                   │
//! │  ├── finalize(&self, order_id, payment, tz)                            │
//! │  └── cancel(&self, order_id)                                           │
//! │       │                                                                 │
//! │       │  SQL Query (runtime-checked, typed rows via FromRow)           │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lookups by id return `Ok(None)` when the row is missing; updates and
//! deletes that touch no row return [`DbError::NotFound`].
//!
//! ## Available Repositories
//!
//! - [`MenuRepository`](menu::MenuRepository) - Categories and menu items
//! - [`InventoryRepository`](inventory::InventoryRepository) - Stock room
//! - [`TableRepository`](table::TableRepository) - Dining tables
//! - [`OrderRepository`](order::OrderRepository) - Orders, lines, finalization
//! - [`UserRepository`](user::UserRepository) - Staff
//! - [`ShiftRepository`](shift::ShiftRepository) - Clock in / clock out
//! - [`ExpenseRepository`](expense::ExpenseRepository) - Back-office spend
//! - [`SettingsRepository`](settings::SettingsRepository) - Cafe key/values
//!
//! [`DbError::NotFound`]: crate::DbError::NotFound

pub mod expense;
pub mod inventory;
pub mod menu;
pub mod order;
pub mod settings;
pub mod shift;
pub mod table;
pub mod user;
