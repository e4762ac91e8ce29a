//! # cafe-db: Database Layer for Cafe POS
//!
//! This crate provides database access for the Cafe POS system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cafe POS Data Flow                               │
//! │                                                                         │
//! │  HTTP handler (POST /api/orders/7/finalize)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     cafe-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  (order.rs)   │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │    │ MenuRepo      │    │ 001_initial_ │  │   │
//! │  │   │ Connection    │◄───│ OrderRepo     │    │  schema.sql  │  │   │
//! │  │   │ Management    │    │ ShiftRepo ... │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ~/.local/share/cafe-pos/cafe.db                               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (menu, order, shift, ...)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cafe_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/cafe.db")).await?;
//!
//! let order = db.orders().create(&NewOrder::default()).await?;
//! let items = db.menu().list_items().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::expense::{ExpenseRepository, NewExpense};
pub use repository::inventory::{InventoryRepository, NewInventoryItem};
pub use repository::menu::{MenuRepository, NewCategory, NewMenuItem};
pub use repository::order::{FinalizeOrder, NewOrder, OrderRepository};
pub use repository::settings::{NewSetting, SettingsRepository};
pub use repository::shift::ShiftRepository;
pub use repository::table::{NewTable, TableRepository};
pub use repository::user::{NewUser, UserRepository};
