//! # Cart Reducer
//!
//! The shopping cart as a reducer over cart actions.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Reducer                                         │
//! │                                                                         │
//! │  Frontend Action          CartAction              State Change          │
//! │  ───────────────          ──────────              ────────────          │
//! │                                                                         │
//! │  Add to Cart ────────────► Add ─────────────────► push or qty += n     │
//! │                                                                         │
//! │  Change Quantity ────────► UpdateQuantity ──────► qty = n (≤0 removes)  │
//! │                                                                         │
//! │  Click Remove ───────────► Remove ──────────────► retain(id != x)      │
//! │                                                                         │
//! │  Order Placed ───────────► Clear ───────────────► items.clear()        │
//! │                                                                         │
//! │  Item count and subtotal are DERIVED on read, never stored.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line per (product, option) pair
//! - Every line has quantity ≥ 1
//! - Insertion order is display order

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{CartLineItem, Product};

/// An action the cart reducer understands.
#[derive(Debug, Clone)]
pub enum CartAction {
    /// Add `quantity` of a product variant. Quantity must already be
    /// validated as positive by the caller.
    Add {
        product: Product,
        option: String,
        quantity: i64,
    },
    /// Delete a line; no-op when absent.
    Remove { item_id: String },
    /// Set a line's quantity; `≤ 0` removes the line.
    UpdateQuantity { item_id: String, quantity: i64 },
    /// Empty the cart (after an order is placed).
    Clear,
}

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Lines in display order.
    pub items: Vec<CartLineItem>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Applies one action to the cart.
    pub fn apply(&mut self, action: CartAction) {
        match action {
            CartAction::Add {
                product,
                option,
                quantity,
            } => {
                let item_id = product.item_id(&option);
                // Existing line: bump quantity, keep the frozen price
                if let Some(line) = self.find_mut(&item_id) {
                    line.quantity += quantity;
                } else {
                    self.items
                        .push(CartLineItem::from_product(&product, &option, quantity));
                }
            }
            CartAction::Remove { item_id } => {
                self.items.retain(|line| line.item_id != item_id);
            }
            CartAction::UpdateQuantity { item_id, quantity } => {
                if quantity <= 0 {
                    self.items.retain(|line| line.item_id != item_id);
                } else if let Some(line) = self.find_mut(&item_id) {
                    line.quantity = quantity;
                }
            }
            CartAction::Clear => self.items.clear(),
        }
    }

    /// Adds a product variant, merging with an existing line.
    pub fn add_to_cart(&mut self, product: &Product, option: &str, quantity: i64) {
        self.apply(CartAction::Add {
            product: product.clone(),
            option: option.to_string(),
            quantity,
        });
    }

    /// Removes a line by id.
    pub fn remove_from_cart(&mut self, item_id: &str) {
        self.apply(CartAction::Remove {
            item_id: item_id.to_string(),
        });
    }

    /// Sets a line's quantity, removing it when `quantity <= 0`.
    pub fn update_quantity(&mut self, item_id: &str, quantity: i64) {
        self.apply(CartAction::UpdateQuantity {
            item_id: item_id.to_string(),
            quantity,
        });
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.apply(CartAction::Clear);
    }

    /// Looks up a line by id.
    pub fn get(&self, item_id: &str) -> Option<&CartLineItem> {
        self.items.iter().find(|line| line.item_id == item_id)
    }

    fn find_mut(&mut self, item_id: &str) -> Option<&mut CartLineItem> {
        self.items.iter_mut().find(|line| line.item_id == item_id)
    }

    /// Sum of quantities over all lines (the navbar badge number).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|line| line.quantity).sum()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of unit price × quantity over all lines.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
