//! # Cart Commands
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │────►│  Order   │       │
//! │  │  Cart    │     │          │     │   Form   │     │  Placed  │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                                 │              │
//! │                   add_to_cart                       place_order        │
//! │                   update_cart_item                  (checkout.rs)      │
//! │                   remove_from_cart                       │              │
//! │                        │                                 │              │
//! │                        ▼                                 ▼              │
//! │                   clear_cart ──────────────────► (back to empty)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The reducer trusts its input; the limits (quantity 1..=999 per line,
//! at most 100 lines) are enforced here, before dispatch.

use serde::Serialize;
use tracing::debug;

use nox_core::validation::{validate_cart_size, validate_quantity};
use nox_core::{
    Cart, CartAction, CartLineItem, CoreError, Money, Product, MAX_CART_ITEMS, MAX_ITEM_QUANTITY,
};

use crate::error::ApiError;
use crate::state::CartState;

/// Cart response including items and totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartLineItem>,
    /// Total units (the badge on the cart icon).
    pub item_count: i64,
    pub subtotal: Money,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            items: cart.items.clone(),
            item_count: cart.item_count(),
            subtotal: cart.subtotal(),
        }
    }
}

/// Gets the current cart contents.
pub fn get_cart(cart: &CartState) -> CartResponse {
    cart.with_cart(|c| CartResponse::from(c))
}

/// Adds a product variant to the cart.
///
/// ## Behavior
/// - Same product + option already in cart: quantity increases
/// - Otherwise: a new line with the price frozen at the time of adding
/// - An option the product does not list is added without a surcharge
///
/// ## Errors
/// - quantity outside 1..=999
/// - a new line when the cart already has 100
/// - a merged quantity over 999
pub fn add_to_cart(
    cart: &CartState,
    product: &Product,
    option: &str,
    quantity: i64,
) -> Result<CartResponse, ApiError> {
    debug!(product_id = product.id, option = %option, quantity, "add_to_cart command");

    validate_quantity(quantity)?;

    if !product.options.is_empty() && product.option(option).is_none() {
        debug!(product_id = product.id, option = %option, "Unlisted option, no surcharge");
    }

    cart.with_cart_mut(|c| -> Result<CartResponse, ApiError> {
        match c.get(&product.item_id(option)) {
            Some(line) => {
                let merged = line.quantity + quantity;
                if merged > MAX_ITEM_QUANTITY {
                    return Err(CoreError::QuantityTooLarge {
                        requested: merged,
                        max: MAX_ITEM_QUANTITY,
                    }
                    .into());
                }
            }
            None => validate_cart_size(c.line_count())
                .map_err(|_| CoreError::CartTooLarge { max: MAX_CART_ITEMS })?,
        }

        c.apply(CartAction::Add {
            product: product.clone(),
            option: option.to_string(),
            quantity,
        });
        Ok(CartResponse::from(&*c))
    })
}

/// Sets the quantity of a line. Quantity 0 (or less) removes it.
pub fn update_cart_item(
    cart: &CartState,
    item_id: &str,
    quantity: i64,
) -> Result<CartResponse, ApiError> {
    debug!(item_id = %item_id, quantity, "update_cart_item command");

    if quantity > MAX_ITEM_QUANTITY {
        return Err(CoreError::QuantityTooLarge {
            requested: quantity,
            max: MAX_ITEM_QUANTITY,
        }
        .into());
    }

    cart.with_cart_mut(|c| -> Result<CartResponse, ApiError> {
        if c.get(item_id).is_none() {
            return Err(CoreError::ItemNotInCart(item_id.to_string()).into());
        }
        c.apply(CartAction::UpdateQuantity {
            item_id: item_id.to_string(),
            quantity,
        });
        Ok(CartResponse::from(&*c))
    })
}

/// Removes a line. Removing a missing line is a no-op.
pub fn remove_from_cart(cart: &CartState, item_id: &str) -> CartResponse {
    debug!(item_id = %item_id, "remove_from_cart command");
    cart.with_cart_mut(|c| {
        c.apply(CartAction::Remove {
            item_id: item_id.to_string(),
        });
        CartResponse::from(&*c)
    })
}

/// Empties the cart.
pub fn clear_cart(cart: &CartState) -> CartResponse {
    debug!("clear_cart command");
    cart.with_cart_mut(|c| {
        c.apply(CartAction::Clear);
        CartResponse::from(&*c)
    })
}
