//! # Validation Module
//!
//! Input validation utilities for Cafe POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (cafe-server)                                   │
//! │  └── Type validation (JSON deserialization)                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Business rule validation (ranges, formats)                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE constraints                                                │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cafe_core::validation::{validate_item_name, validate_quantity};
//!
//! assert!(validate_item_name("Masala Chai").is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::{MAX_ITEM_QUANTITY, MAX_ORDER_ITEMS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Length of a GST identification number.
pub const GSTIN_LENGTH: usize = 15;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required display name (menu item, category, table, ...).
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 200 characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a menu item name.
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    validate_name("name", name)
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (returns everything)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

/// Validates a settings key: non-empty, lowercase snake case.
pub fn validate_setting_key(key: &str) -> ValidationResult<()> {
    if key.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "key".to_string(),
        });
    }

    if key.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "key".to_string(),
            max: 100,
        });
    }

    if !key
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "key".to_string(),
            reason: "must contain only lowercase letters, digits and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a staff login handle.
///
/// ## Rules
/// - 3 to 32 characters
/// - Lowercase ASCII letters, digits, `.`, `_` or `-`
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let len = username.chars().count();
    if !(3..=32).contains(&len) {
        return Err(ValidationError::OutOfRange {
            field: "username length".to_string(),
            min: 3,
            max: 32,
        });
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-'))
    {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "must contain only lowercase letters, digits, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

/// Validates a GSTIN (GST identification number).
///
/// ## Rules
/// - Exactly 15 ASCII letters or digits
/// - Starts with a two-digit state code
///
/// ## Example
/// ```rust
/// use cafe_core::validation::validate_gstin;
///
/// assert!(validate_gstin("29AABCT1332L1ZT").is_ok());
/// assert!(validate_gstin("29AABCT").is_err());
/// ```
pub fn validate_gstin(gstin: &str) -> ValidationResult<()> {
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "gstin".to_string(),
        reason: reason.to_string(),
    };

    if gstin.len() != GSTIN_LENGTH || !gstin.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid("must be 15 letters or digits"));
    }

    if !gstin.chars().take(2).all(|c| c.is_ascii_digit()) {
        return Err(invalid("must start with a two-digit state code"));
    }

    Ok(())
}

/// Validates a phone number: an optional leading `+`, then 7 to 15 digits
/// with optional spaces or hyphens.
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let body = phone.strip_prefix('+').unwrap_or(phone);
    let digits = body.chars().filter(|c| c.is_ascii_digit()).count();

    let well_formed = body
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '-');

    if !well_formed || !(7..=15).contains(&digits) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must be 7 to 15 digits".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line item quantity.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Order: Add Item                                                        │
/// │                                                                         │
/// │  Waiter enters quantity: 5                                              │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(5) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"               │
/// │       │                                                                 │
/// │       ├── qty > 999? → Error: "quantity must be between 1 and 999"     │
/// │       │                                                                 │
/// │       └── OK → line is added                                            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in paise. Zero is allowed (complimentary items).
pub fn validate_price_paise(paise: i64) -> ValidationResult<()> {
    if paise < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points: 0% to 100%.
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10_000,
        });
    }

    Ok(())
}

/// Validates an expense amount in paise; must be positive.
pub fn validate_expense_amount(paise: i64) -> ValidationResult<()> {
    if paise <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    Ok(())
}

/// Validates seating capacity of a dining table.
pub fn validate_capacity(capacity: i64) -> ValidationResult<()> {
    if capacity < 1 {
        return Err(ValidationError::MustBePositive {
            field: "capacity".to_string(),
        });
    }

    Ok(())
}

/// Validates an inventory quantity or threshold.
pub fn validate_stock_level(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a non-negative number".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates that one more line fits on an order.
pub fn validate_order_size(current_items: usize) -> ValidationResult<()> {
    if current_items >= MAX_ORDER_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "order items".to_string(),
            min: 0,
            max: MAX_ORDER_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
