//! # Checkout Commands
//!
//! ## Order Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         place_order                                     │
//! │                                                                         │
//! │  1. Customer form valid?  ── no ──► VALIDATION_ERROR (first bad field)  │
//! │             │                                                           │
//! │  2. Lock cart, non-empty? ── no ──► EMPTY_CART                          │
//! │             │                                                           │
//! │  3. OrderTotals::compute(subtotal, shipping, promo)                     │
//! │             │                                                           │
//! │  4. Snapshot lines, clear cart (same lock)                              │
//! │             │                                                           │
//! │  5. OrderConfirmation { order id, NOX###### number, lines, totals }     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no payment step; an order is confirmed once it passes
//! validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use nox_core::checkout::order_number;
use nox_core::{CartAction, CartLineItem, CoreError, OrderTotals, ShippingMethod};

use crate::error::ApiError;
use crate::state::{CartState, CustomerState};

/// Shipping and promo choices from the checkout page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutRequest {
    pub shipping: ShippingMethod,
    pub promo_code: Option<String>,
}

impl CheckoutRequest {
    fn promo(&self) -> Option<&str> {
        self.promo_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }
}

/// What the confirmation screen shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub order_id: Uuid,
    pub order_number: String,
    pub placed_at: DateTime<Utc>,
    pub customer_email: String,
    pub shipping: ShippingMethod,
    pub delivery_estimate: String,
    pub lines: Vec<CartLineItem>,
    pub totals: OrderTotals,
}

/// Prices the current cart without placing anything.
pub fn quote_order(cart: &CartState, request: &CheckoutRequest) -> OrderTotals {
    cart.with_cart(|c| OrderTotals::compute(c.subtotal(), request.shipping, request.promo()))
}

/// Places the order and empties the cart.
///
/// The customer form is left as is so a returning customer does not have
/// to type it again.
pub async fn place_order(
    cart: &CartState,
    customer: &CustomerState,
    request: &CheckoutRequest,
) -> Result<OrderConfirmation, ApiError> {
    debug!(shipping = ?request.shipping, "place_order command");

    let customer_email = {
        let store = customer.lock().await;
        let validation = store.validate();
        if let Some(field) = validation.first_invalid() {
            let message = validation.error(field).unwrap_or("Please check your details");
            debug!(%field, "Checkout blocked by customer form");
            return Err(ApiError::validation(message));
        }
        store.info().email.trim().to_string()
    };

    let (lines, totals) = cart.with_cart_mut(|c| -> Result<_, ApiError> {
        if c.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }
        let totals = OrderTotals::compute(c.subtotal(), request.shipping, request.promo());
        let lines = c.items.clone();
        c.apply(CartAction::Clear);
        Ok((lines, totals))
    })?;

    let placed_at = Utc::now();
    let confirmation = OrderConfirmation {
        order_id: Uuid::new_v4(),
        order_number: order_number(placed_at.timestamp_millis()),
        placed_at,
        customer_email,
        shipping: request.shipping,
        delivery_estimate: request.shipping.delivery_estimate().to_string(),
        lines,
        totals,
    };

    info!(
        order_id = %confirmation.order_id,
        order_number = %confirmation.order_number,
        lines = confirmation.lines.len(),
        total = confirmation.totals.total.cents(),
        "Order placed"
    );

    Ok(confirmation)
}
