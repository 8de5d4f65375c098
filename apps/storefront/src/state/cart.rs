//! # Cart State
//!
//! The session's cart behind a mutex, shared by the cart and checkout
//! commands.
//!
//! ```text
//! add_to_cart ─┐
//! update_item ─┼──► CartState::with_cart_mut ──► Cart::apply(CartAction)
//! place_order ─┘
//! get_cart ────────► CartState::with_cart
//! ```
//!
//! The cart is not persisted; it lives as long as the session.

use std::sync::{Arc, Mutex};

use nox_core::Cart;

/// Thread-safe cart wrapper.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    /// Creates a new empty cart state.
    pub fn new() -> Self {
        CartState::default()
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let subtotal = cart_state.with_cart(|cart| cart.subtotal());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        // A panic mid-update leaves a structurally valid Vec, so keep going.
        let cart = self.cart.lock().unwrap_or_else(|e| e.into_inner());
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut cart)
    }
}
