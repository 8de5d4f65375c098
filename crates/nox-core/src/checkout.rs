//! # Checkout Totals
//!
//! Shipping, promo discount, tax and grand total for an order.
//!
//! ## Calculation
//! ```text
//! subtotal                          $300.00
//! - promo (CYBER10 = 10% of sub)    - $30.00
//! + shipping (express)              + $29.99
//!                                   ────────
//! taxable                           $299.99
//! + tax (8% of taxable)             + $24.00   (rounded half up)
//!                                   ════════
//! total                             $323.99
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{Money, Rate};

/// Sales tax applied to every order.
pub const TAX_RATE: Rate = Rate::from_bps(800);

/// The one promo code the storefront honours.
pub const PROMO_CYBER10: &str = "CYBER10";

/// Discount granted by [`PROMO_CYBER10`].
pub const PROMO_CYBER10_RATE: Rate = Rate::from_bps(1_000);

/// Delivery speed chosen at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ShippingMethod {
    /// Free, 5-7 business days.
    #[default]
    Standard,
    /// $29.99, 2-3 business days.
    Express,
}

impl ShippingMethod {
    /// Shipping charge.
    pub fn price(&self) -> Money {
        match self {
            ShippingMethod::Standard => Money::zero(),
            ShippingMethod::Express => Money::from_cents(2_999),
        }
    }

    /// Option label on the shipping picker.
    pub fn label(&self) -> &'static str {
        match self {
            ShippingMethod::Standard => "Standard Shipping (5-7 days)",
            ShippingMethod::Express => "Express Shipping (2-3 days)",
        }
    }

    /// Delivery estimate on the confirmation screen.
    pub fn delivery_estimate(&self) -> &'static str {
        match self {
            ShippingMethod::Standard => "5-7 business days",
            ShippingMethod::Express => "2-3 business days",
        }
    }
}

/// Discount for a promo code. Unknown or empty codes give nothing.
///
/// Codes are matched exactly, case included.
pub fn promo_discount(subtotal: Money, promo_code: Option<&str>) -> Money {
    match promo_code {
        Some(PROMO_CYBER10) => subtotal.percentage(PROMO_CYBER10_RATE),
        _ => Money::zero(),
    }
}

/// Money breakdown of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub subtotal: Money,
    pub promo_discount: Money,
    pub shipping: Money,
    pub tax: Money,
    pub total: Money,
}

impl OrderTotals {
    /// Computes totals for a cart subtotal.
    ///
    /// ## Example
    /// ```rust
    /// use nox_core::checkout::{OrderTotals, ShippingMethod};
    /// use nox_core::money::Money;
    ///
    /// let totals = OrderTotals::compute(Money::from_cents(30_000), ShippingMethod::Standard, None);
    /// assert_eq!(totals.tax.cents(), 2_400);
    /// assert_eq!(totals.total.cents(), 32_400);
    /// ```
    pub fn compute(subtotal: Money, shipping: ShippingMethod, promo_code: Option<&str>) -> Self {
        let promo_discount = promo_discount(subtotal, promo_code);
        let shipping = shipping.price();
        let tax = (subtotal - promo_discount + shipping).percentage(TAX_RATE);

        OrderTotals {
            subtotal,
            promo_discount,
            shipping,
            tax,
            total: subtotal - promo_discount + shipping + tax,
        }
    }
}

/// Customer-facing order number: `NOX` plus the last six digits of the
/// order's millisecond timestamp.
pub fn order_number(timestamp_millis: i64) -> String {
    format!("NOX{:06}", timestamp_millis.rem_euclid(1_000_000))
}
