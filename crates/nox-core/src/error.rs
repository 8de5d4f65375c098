//! # Error Types
//!
//! Domain-specific error types for nox-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  nox-core errors (this file)                                           │
//! │  ├── CoreError        - Cart and checkout rule violations              │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  nox-store errors (separate crate)                                     │
//! │  └── StoreError       - Storage operation failures                     │
//! │                                                                         │
//! │  nox-auth errors (separate crate)                                      │
//! │  └── AuthError        - Rate limit, validation, provider failures      │
//! │                                                                         │
//! │  Storefront API errors (in app)                                        │
//! │  └── ApiError         - What the frontend sees (serialized)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Form-level checkout validation does NOT use these types: it produces a
//! field-to-message map (see [`crate::customer::CustomerValidation`]).

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Cart line cannot be found.
    #[error("Item {0} not in cart")]
    ItemNotInCart(String),

    /// Checkout attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    ///
    /// ## When This Occurs
    /// ```text
    /// Cart: "Neon Sign-RGB" x 990
    ///      │
    ///      ▼
    /// Add to Cart (qty: 20)
    ///      │
    ///      ▼
    /// QuantityTooLarge { requested: 1010, max: 999 }
    /// ```
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used by command-level validation before the reducers run.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format, carrying the user-facing message.
    #[error("{message}")]
    Invalid { field: String, message: String },

    /// Two values that must match do not.
    #[error("{0} do not match")]
    Mismatch(String),
}

impl ValidationError {
    /// Creates an `Invalid` error from a field name and user-facing message.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::QuantityTooLarge {
            requested: 1010,
            max: 999,
        };
        assert_eq!(err.to_string(), "Quantity 1010 exceeds maximum allowed (999)");
        assert_eq!(
            CoreError::ItemNotInCart("1-RGB".to_string()).to_string(),
            "Item 1-RGB not in cart"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: 999,
        };
        assert_eq!(err.to_string(), "quantity must be between 1 and 999");

        let err = ValidationError::invalid("phone", "Invalid phone number format");
        assert_eq!(err.to_string(), "Invalid phone number format");

        let err = ValidationError::Mismatch("Passwords".to_string());
        assert_eq!(err.to_string(), "Passwords do not match");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
