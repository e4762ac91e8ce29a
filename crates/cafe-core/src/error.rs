//! # Error Types
//!
//! Domain-specific error types for cafe-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cafe-core errors (this file)                                          │
//! │  ├── CoreError        - Order lifecycle and business rule failures     │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  cafe-core::render                                                     │
//! │  └── RenderError      - Print surface could not be acquired            │
//! │                                                                         │
//! │  cafe-db errors (separate crate)                                       │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  cafe-server errors                                                    │
//! │  └── ApiError         - What HTTP clients see (serialized)             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The tax engine itself never fails; nothing in [`crate::gst`] returns
//! these types.

use thiserror::Error;

use crate::types::OrderStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Menu item cannot be found.
    #[error("Menu item not found: {0}")]
    MenuItemNotFound(i64),

    /// Staff member cannot be found.
    #[error("User not found: {0}")]
    UserNotFound(i64),

    /// Order cannot be found.
    #[error("Order not found: {0}")]
    OrderNotFound(i64),

    /// Order is not in a state that allows the requested operation.
    ///
    /// ## When This Occurs
    /// - Adding items to a completed order
    /// - Finalizing an order twice
    /// - Cancelling an order that is already cancelled
    ///
    /// ## User Workflow
    /// ```text
    /// Order #12 (completed)
    ///      │
    ///      ▼
    /// POST /api/orders/12/items
    ///      │
    ///      ▼
    /// InvalidOrderStatus { order_id: 12, current_status: Completed }
    ///      │
    ///      ▼
    /// 409 Conflict: "Order 12 is completed, cannot perform operation"
    /// ```
    #[error("Order {order_id} is {current_status}, cannot perform operation")]
    InvalidOrderStatus {
        order_id: i64,
        current_status: OrderStatus,
    },

    /// Finalizing an order with no line items.
    #[error("Order has no items")]
    EmptyOrder,

    /// Line item is not part of the order being edited.
    #[error("Line item not found in order: {0}")]
    ItemNotInOrder(String),

    /// Order has exceeded maximum allowed line items.
    #[error("Order cannot have more than {max} items")]
    OrderTooLarge { max: usize },

    /// Item quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Employee tried to clock in while a shift is still open.
    #[error("User {user_id} already has an active shift")]
    ShiftAlreadyActive { user_id: i64 },

    /// Deactivated staff cannot start a shift.
    #[error("User {0} is inactive")]
    UserInactive(i64),

    /// Clocking out a shift that has already ended.
    #[error("Shift {0} is already clocked out")]
    ShiftAlreadyClosed(i64),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before business logic runs, usually straight from a request body.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed GSTIN, bad date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
