//! # API Error Type
//!
//! Unified error type for storefront commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Storefront                         │
//! │                                                                         │
//! │  Command Function  Result<T, ApiError>                                 │
//! │         │                                                               │
//! │         ├── ValidationError ─────────────┐                             │
//! │         ├── CoreError (cart/checkout) ───┤                             │
//! │         ├── StoreError (local storage) ──┼──► ApiError { code, message }│
//! │         └── AuthError (session facade) ──┘                             │
//! │                                                                         │
//! │  Frontend:                                                             │
//! │    catch (e) { e.code === 'RATE_LIMITED' ... e.message }               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Storage details are logged, never returned; the user sees generic copy.

use serde::Serialize;

use nox_auth::AuthError;
use nox_core::{CoreError, ValidationError};
use nox_store::StoreError;

/// API error returned from storefront commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "Please enter a valid email address"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed (400)
    ValidationError,

    /// Cart operation failed
    CartError,

    /// Checkout attempted on an empty cart
    EmptyCart,

    /// Local storage failed (500)
    StorageError,

    /// Too many attempts (429)
    RateLimited,

    /// Identity provider refused the call
    AuthError,

    /// Request looks automated
    AccessDenied,

    /// Internal error (500)
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a cart error.
    pub fn cart(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::CartError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ItemNotInCart(id) => ApiError::cart(format!("Item {} not in cart", id)),
            CoreError::EmptyCart => ApiError::new(ErrorCode::EmptyCart, "Your cart is empty"),
            CoreError::CartTooLarge { max } => {
                ApiError::cart(format!("Cart cannot have more than {} items", max))
            }
            CoreError::QuantityTooLarge { requested, max } => ApiError::validation(format!(
                "Quantity {} exceeds maximum allowed ({})",
                requested, max
            )),
            CoreError::Validation(e) => e.into(),
        }
    }
}

/// Converts storage errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "Local storage operation failed");
        match err {
            StoreError::Closed => ApiError::new(ErrorCode::StorageError, "Storage is unavailable"),
            _ => ApiError::new(ErrorCode::StorageError, "Could not save your details"),
        }
    }
}

/// Converts auth errors to API errors. Auth messages are already safe to
/// display.
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::RateLimited { message, .. } => ApiError::new(ErrorCode::RateLimited, message),
            AuthError::Validation(message) => ApiError::validation(message),
            AuthError::Provider { message, .. } => ApiError::new(ErrorCode::AuthError, message),
            AuthError::Config(message) => {
                tracing::error!(%message, "Auth misconfigured");
                ApiError::internal("Authentication is not configured")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Startup Errors
// =============================================================================

/// Failures while booting the storefront. These never reach the pages.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Could not determine database path: {0}")]
    DataDir(#[from] std::io::Error),

    #[error("Local storage unavailable: {0}")]
    Storage(#[from] StoreError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}
