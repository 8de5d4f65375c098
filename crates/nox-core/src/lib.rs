//! # nox-core: Pure Business Logic for the Nox Storefront
//!
//! This crate is the **heart** of the storefront. It contains the cart,
//! checkout and validation logic as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Nox Storefront Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (SPA, out of scope)                 │   │
//! │  │   Collection ──► Product ──► Cart ──► Checkout ──► Dashboard    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    Storefront Commands                          │   │
//! │  │    add_to_cart, place_order, sign_in, update_profile, etc.      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ nox-core (THIS CRATE) ★                         │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   cart    │  │ customer  │  │ validation│  │rate_limit │  │   │
//! │  │   │  reducer  │  │  reducer  │  │  email,   │  │  fixed    │  │   │
//! │  │   │  totals   │  │  checks   │  │  password │  │  window   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          nox-store (storage)       nox-auth (identity)          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Catalog and cart types (Product, CartLineItem)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validators and sanitization
//! - [`password`] - Password strength scoring
//! - [`rate_limit`] - Advisory fixed-window rate limiter
//! - [`cart`] - Cart reducer
//! - [`customer`] - Checkout form record, reducer and validation
//! - [`checkout`] - Order totals (shipping, promo, tax)
//!
//! ## Example Usage
//!
//! ```rust
//! use nox_core::cart::Cart;
//! use nox_core::types::{Product, ProductOption};
//!
//! let product = Product::new(1, "Neon Sign", 10_000)
//!     .with_option(ProductOption::new("RGB", Some(5_000)));
//!
//! let mut cart = Cart::new();
//! cart.add_to_cart(&product, "RGB", 2);
//!
//! assert_eq!(cart.subtotal().cents(), 30_000); // $300.00
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod checkout;
pub mod customer;
pub mod error;
pub mod money;
pub mod password;
pub mod rate_limit;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartAction};
pub use checkout::{OrderTotals, ShippingMethod};
pub use customer::{
    validate_customer_info, CustomerAction, CustomerField, CustomerFlag, CustomerInfo,
    CustomerValidation,
};
pub use error::{CoreError, ValidationError};
pub use money::{Money, Rate};
pub use password::{password_strength, PasswordStrength, StrengthLevel};
pub use rate_limit::{Clock, ManualClock, RateLimiter, SystemClock};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Storage key the checkout form is persisted under.
pub const CUSTOMER_INFO_KEY: &str = "nox-customer-info";

/// Maximum distinct lines allowed in a single cart
///
/// ## Business Reason
/// Prevents runaway carts and keeps order payloads reasonable.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line in the cart
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10)
pub const MAX_ITEM_QUANTITY: i64 = 999;
