//! # Storefront Commands
//!
//! Everything the storefront pages call.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── cart.rs      ◄─── Cart manipulation
//! ├── customer.rs  ◄─── Checkout form edits and persistence
//! ├── checkout.rs  ◄─── Quotes and order placement
//! └── account.rs   ◄─── Sign-up, sign-in, profile, password
//! ```
//!
//! ## State Injection
//! Each command takes only the state it needs:
//! ```rust,ignore
//! // Only needs the cart
//! fn get_cart(cart: &CartState) -> CartResponse
//!
//! // Needs both cart and customer form
//! async fn place_order(cart: &CartState, customer: &CustomerState, ...)
//!
//! // Needs the auth facade
//! async fn sign_in<P: IdentityProvider>(auth: &AuthFacade<P>, ...)
//! ```
//!
//! Failures come back as [`ApiError`](crate::error::ApiError) with a
//! SCREAMING_SNAKE_CASE code the page can branch on.

pub mod account;
pub mod cart;
pub mod checkout;
pub mod customer;
