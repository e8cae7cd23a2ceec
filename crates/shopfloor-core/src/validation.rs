//! # Validation Module
//!
//! Single-value input checks shared by both carts and the lookup commands.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Input checks (THIS MODULE)                                   │
//! │  ├── quantity > 0, amounts >= 0 and under the cart ceiling             │
//! │  ├── search term length                                                │
//! │  └── Fails fast with ValidationError → CoreError::InputRejected        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Stock admission (stock.rs)                                   │
//! │  └── AdmissionDenied, cart unchanged                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Submission validation (cart.rs, work_order.rs)               │
//! │  └── Collects every ValidationIssue before the remote call            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use shopfloor_core::money::Money;
//! use shopfloor_core::validation::{validate_non_negative, validate_quantity};
//!
//! assert!(validate_quantity(5).is_ok());
//! assert!(validate_quantity(0).is_err());
//! assert!(validate_non_negative("discount", Money::from_cents(-1)).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest search term forwarded to a lookup.
pub const MAX_SEARCH_QUERY_LEN: usize = 100;

/// Largest amount a cart subtotal, discount or manual tax may reach
/// (one trillion in major units). Keeps every totals computation inside
/// `i64` cents.
pub const MAX_CART_AMOUNT: Money = Money::from_cents(100_000_000_000_000);

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity: must be positive.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a monetary input (discount, manual tax). Zero is allowed.
pub fn validate_non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates that an amount stays under [`MAX_CART_AMOUNT`].
pub fn validate_within_limit(field: &str, amount: Money) -> ValidationResult<()> {
    if amount > MAX_CART_AMOUNT {
        return Err(ValidationError::TooLarge {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a line of `quantity` × `unit_price` joining lines that already
/// add up to `rest`.
///
/// ## Returns
/// The line subtotal, if both it and the new cart subtotal fit under
/// [`MAX_CART_AMOUNT`].
pub fn validate_line_amount(unit_price: Money, quantity: i64, rest: Money) -> ValidationResult<Money> {
    let too_large = || ValidationError::TooLarge {
        field: "line total".to_string(),
    };

    let line = unit_price.checked_multiply_quantity(quantity).ok_or_else(too_large)?;
    let subtotal = rest.checked_add(line).ok_or_else(too_large)?;
    validate_within_limit("line total", subtotal)?;

    Ok(line)
}

/// Validates an odometer reading.
pub fn validate_odometer(reading: i64) -> ValidationResult<u32> {
    if reading < 0 {
        return Err(ValidationError::Negative {
            field: "odometer".to_string(),
        });
    }

    u32::try_from(reading).map_err(|_| ValidationError::InvalidFormat {
        field: "odometer".to_string(),
        reason: "reading is too large".to_string(),
    })
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a search term.
///
/// ## Rules
/// - Can be empty (the lookup returns its default list)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_SEARCH_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

/// Returns true if a free-text field has visible content.
pub fn is_present(text: &str) -> bool {
    !text.trim().is_empty()
}

// =============================================================================
// Unit Tests
// =============================================================================
