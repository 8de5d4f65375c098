//! # Domain Types
//!
//! Catalog and cart types used throughout the storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │    Product      │   │  ProductOption  │   │    CartLineItem     │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  id             │──►│  name ("RGB")   │──►│  item_id "1-RGB"    │   │
//! │  │  name           │   │  price_cents?   │   │  unit_price_cents   │   │
//! │  │  base_price     │   │  (surcharge)    │   │  quantity           │   │
//! │  │  options[]      │   └─────────────────┘   │  option, color, ... │   │
//! │  └─────────────────┘                         └─────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A line item freezes name, price and presentation tags at the moment the
//! product is added, so later catalog edits never change what is in a cart.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Image shown for products that ship without a gallery.
pub const PLACEHOLDER_IMAGE: &str = "/api/placeholder/150/150";

// =============================================================================
// Product
// =============================================================================

/// A selectable product variant, e.g. "RGB" or "Warm White".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductOption {
    /// Display name, also part of the cart line identity.
    pub name: String,

    /// Surcharge over the base price. `None` means no surcharge.
    pub price_cents: Option<i64>,
}

impl ProductOption {
    /// Creates an option with an optional surcharge.
    pub fn new(name: impl Into<String>, price_cents: Option<i64>) -> Self {
        ProductOption {
            name: name.into(),
            price_cents,
        }
    }

    /// Returns the surcharge, zero when none is set.
    #[inline]
    pub fn surcharge(&self) -> Money {
        Money::from_cents(self.price_cents.unwrap_or(0))
    }
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Catalog identifier.
    pub id: u32,

    /// Display name.
    pub name: String,

    /// Price before any option surcharge, in cents.
    pub base_price_cents: i64,

    /// Variants the customer chooses from.
    #[serde(default)]
    pub options: Vec<ProductOption>,

    /// Neon color tag used by the frontend theme.
    #[serde(default)]
    pub color: String,

    /// Collection category tag.
    #[serde(default)]
    pub category: String,

    /// Image references; the first one is the cart thumbnail.
    #[serde(default)]
    pub images: Vec<String>,
}

impl Product {
    /// Creates a product with no options, tags or images.
    pub fn new(id: u32, name: impl Into<String>, base_price_cents: i64) -> Self {
        Product {
            id,
            name: name.into(),
            base_price_cents,
            options: Vec::new(),
            color: String::new(),
            category: String::new(),
            images: Vec::new(),
        }
    }

    /// Adds a variant.
    pub fn with_option(mut self, option: ProductOption) -> Self {
        self.options.push(option);
        self
    }

    /// Sets the color and category tags.
    pub fn with_tags(mut self, color: impl Into<String>, category: impl Into<String>) -> Self {
        self.color = color.into();
        self.category = category.into();
        self
    }

    /// Adds an image reference.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.images.push(image.into());
        self
    }

    /// Returns the base price as Money.
    #[inline]
    pub fn base_price(&self) -> Money {
        Money::from_cents(self.base_price_cents)
    }

    /// Finds a variant by exact name.
    pub fn option(&self, name: &str) -> Option<&ProductOption> {
        self.options.iter().find(|o| o.name == name)
    }

    /// Surcharge for the named variant, zero if absent or unpriced.
    pub fn surcharge_for(&self, option_name: &str) -> Money {
        self.option(option_name)
            .map(ProductOption::surcharge)
            .unwrap_or_default()
    }

    /// Cart line identity for this product and variant.
    pub fn item_id(&self, option_name: &str) -> String {
        format!("{}-{}", self.id, option_name)
    }

    /// Thumbnail for cart display.
    pub fn thumbnail(&self) -> &str {
        self.images
            .first()
            .map(String::as_str)
            .unwrap_or(PLACEHOLDER_IMAGE)
    }
}

// =============================================================================
// Cart Line Item
// =============================================================================

/// One row in the cart: a product+option pair and its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// `"<productId>-<optionName>"`, unique within a cart.
    pub item_id: String,
    pub product_id: u32,
    /// Product name at time of adding (frozen).
    pub name: String,
    /// Base price plus option surcharge (frozen).
    pub unit_price_cents: i64,
    pub base_price_cents: i64,
    pub option_surcharge_cents: i64,
    /// Always ≥ 1 while the line exists.
    pub quantity: i64,
    pub color: String,
    pub option: String,
    pub category: String,
    pub image: String,
}

impl CartLineItem {
    /// Snapshots a product and chosen variant into a new line.
    pub fn from_product(product: &Product, option_name: &str, quantity: i64) -> Self {
        let surcharge = product.surcharge_for(option_name);
        let unit_price = product.base_price() + surcharge;

        CartLineItem {
            item_id: product.item_id(option_name),
            product_id: product.id,
            name: product.name.clone(),
            unit_price_cents: unit_price.cents(),
            base_price_cents: product.base_price_cents,
            option_surcharge_cents: surcharge.cents(),
            quantity,
            color: product.color.clone(),
            option: option_name.to_string(),
            category: product.category.clone(),
            image: product.thumbnail().to_string(),
        }
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
