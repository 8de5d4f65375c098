//! # Nox Storefront Diagnostic Entry Point
//!
//! Boots the full stack against the in-memory identity provider and prints
//! what it found: where the database lives, whether a checkout form was
//! restored, and the auth settings in effect.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  main.rs ──► init_tracing                                    │
//! │          ──► StorefrontConfig::from_env (NOX_*)              │
//! │          ──► AuthConfig::load_or_default (auth.toml)         │
//! │          ──► Storefront::bootstrap                           │
//! │          ──► status summary ──► shutdown (flushes the form)  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Useful for checking a data directory: `NOX_DB_PATH=./nox.db nox-storefront`.

use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};

use nox_auth::{AuthConfig, MockIdentityProvider};
use nox_storefront::commands::{cart, customer};
use nox_storefront::state::StorefrontConfig;
use nox_storefront::{init_tracing, Storefront};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    info!("Starting Nox storefront diagnostics");

    let config = StorefrontConfig::from_env();
    let auth_config = AuthConfig::load_or_default(None);
    let provider = Arc::new(MockIdentityProvider::new());

    let storefront = match Storefront::bootstrap(config, auth_config, provider).await {
        Ok(storefront) => storefront,
        Err(e) => {
            error!(error = %e, "Storefront failed to start");
            return ExitCode::FAILURE;
        }
    };

    let form = customer::get_customer_info(&storefront.customer).await;
    let validation = customer::validate_customer(&storefront.customer).await;
    let basket = cart::get_cart(&storefront.cart);
    let auth = storefront.auth.config();

    println!("{}", storefront.config.store_name);
    println!(
        "  database:        {}",
        storefront
            .config
            .database_path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "platform data directory".to_string())
    );
    println!("  debounce:        {}ms", storefront.config.debounce_ms);
    println!(
        "  saved form:      {}",
        if form.email.is_empty() { "none" } else { "restored" }
    );
    println!(
        "  form complete:   {} ({} field(s) missing or invalid)",
        validation.is_valid,
        validation.errors.len()
    );
    println!(
        "  cart:            {} item(s), {}",
        basket.item_count,
        storefront.config.format_currency(basket.subtotal.cents())
    );
    println!("  site url:        {}", auth.site_url());
    println!(
        "  login limit:     {} per {}s",
        auth.rate_limit.login_max_attempts, auth.rate_limit.login_window_secs
    );
    println!(
        "  signed in:       {}",
        storefront.auth.is_authenticated().await
    );

    storefront.shutdown().await;
    ExitCode::SUCCESS
}
