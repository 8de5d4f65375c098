//! # Customer Commands
//!
//! The checkout form. Every keystroke lands here and is persisted after a
//! quiet period; checkout reads the same record.
//!
//! ```text
//! update_customer_field ──┐
//! set_customer_flag ──────┼──► CustomerStore::apply ──► (debounce) ──► storage
//! set_customer_info ──────┘
//! save_customer_info ─────────► CustomerStore::flush ─────────────────► storage
//! clear_customer_data ────────► CustomerStore::clear ──► remove key
//! ```

use tracing::debug;

use nox_core::{CustomerAction, CustomerField, CustomerFlag, CustomerInfo, CustomerValidation};

use crate::error::ApiError;
use crate::state::CustomerState;

/// Gets the current checkout form.
pub async fn get_customer_info(customer: &CustomerState) -> CustomerInfo {
    customer.lock().await.info().clone()
}

/// Updates one text field. The value is stored as typed.
pub async fn update_customer_field(
    customer: &CustomerState,
    field: CustomerField,
    value: String,
) -> CustomerInfo {
    // Field names only: values may be passwords.
    debug!(%field, "update_customer_field command");

    let mut store = customer.lock().await;
    store.apply(CustomerAction::UpdateText { field, value });
    store.info().clone()
}

/// Toggles a checkbox.
pub async fn set_customer_flag(
    customer: &CustomerState,
    flag: CustomerFlag,
    value: bool,
) -> CustomerInfo {
    debug!(?flag, value, "set_customer_flag command");

    let mut store = customer.lock().await;
    store.apply(CustomerAction::UpdateFlag { flag, value });
    store.info().clone()
}

/// Replaces the whole form.
pub async fn set_customer_info(customer: &CustomerState, info: CustomerInfo) -> CustomerInfo {
    debug!("set_customer_info command");

    let mut store = customer.lock().await;
    store.set_customer_info(info);
    store.info().clone()
}

/// Validates the form as it stands.
pub async fn validate_customer(customer: &CustomerState) -> CustomerValidation {
    customer.lock().await.validate()
}

/// Writes the form now instead of waiting out the debounce.
pub async fn save_customer_info(customer: &CustomerState) -> Result<(), ApiError> {
    debug!("save_customer_info command");
    customer.lock().await.flush().await?;
    Ok(())
}

/// Resets the form and deletes the saved copy.
pub async fn clear_customer_data(customer: &CustomerState) -> Result<CustomerInfo, ApiError> {
    debug!("clear_customer_data command");

    let mut store = customer.lock().await;
    store.clear().await?;
    Ok(store.info().clone())
}
