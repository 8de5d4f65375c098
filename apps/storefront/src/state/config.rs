//! # Storefront Configuration
//!
//! Read once at startup and shared read-only.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`NOX_*`)
//! 2. Defaults (this file)
//!
//! Auth settings live separately in `nox_auth::AuthConfig` (`auth.toml`).

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use nox_store::DEFAULT_DEBOUNCE;

/// Path value selecting an in-memory database.
pub const IN_MEMORY_DB: &str = ":memory:";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontConfig {
    /// Store name (page titles, order emails)
    pub store_name: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places for currency
    pub currency_decimals: u8,

    /// Explicit database path. `None` uses the platform data directory.
    pub database_path: Option<PathBuf>,

    /// Idle window before checkout form edits are written, in milliseconds.
    pub debounce_ms: u64,

    /// Identifies this client for auth rate limiting (a user agent in a
    /// browser build).
    pub client_id: String,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        StorefrontConfig {
            store_name: "NOX // Neon Goods".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            database_path: None,
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
            client_id: "unknown".to_string(),
        }
    }
}

impl StorefrontConfig {
    /// Creates a config from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `NOX_STORE_NAME`: Override store name
    /// - `NOX_DB_PATH`: Database file (`:memory:` for an ephemeral store)
    /// - `NOX_DEBOUNCE_MS`: Customer-form save debounce
    /// - `NOX_CLIENT_ID`: Client identifier for rate-limit keys
    pub fn from_env() -> Self {
        let mut config = StorefrontConfig::default();

        if let Ok(name) = std::env::var("NOX_STORE_NAME") {
            config.store_name = name;
        }

        if let Ok(path) = std::env::var("NOX_DB_PATH") {
            debug!(path = %path, "Database path from environment");
            config.database_path = Some(PathBuf::from(path));
        }

        if let Ok(ms) = std::env::var("NOX_DEBOUNCE_MS") {
            if let Ok(ms) = ms.parse::<u64>() {
                config.debounce_ms = ms;
            }
        }

        if let Ok(client_id) = std::env::var("NOX_CLIENT_ID") {
            config.client_id = client_id;
        }

        config
    }

    /// A config backed by an in-memory database, for tests.
    pub fn in_memory() -> Self {
        StorefrontConfig {
            database_path: Some(PathBuf::from(IN_MEMORY_DB)),
            ..StorefrontConfig::default()
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path
            .as_deref()
            .is_some_and(|p| p.as_os_str() == IN_MEMORY_DB)
    }

    /// Resolves the database file path.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/io.nox.nox-storefront/nox.db`
    /// - **Windows**: `%APPDATA%\nox\nox-storefront\data\nox.db`
    /// - **Linux**: `~/.local/share/nox-storefront/nox.db`
    pub fn resolve_database_path(&self) -> std::io::Result<PathBuf> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }

        let dirs = directories::ProjectDirs::from("io", "nox", "nox-storefront").ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine app data directory",
            )
        })?;

        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;
        Ok(data_dir.join("nox.db"))
    }

    /// Formats a cent amount as a currency string.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = StorefrontConfig::default();
    /// assert_eq!(config.format_currency(34999), "$349.99");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let divisor = 10_i64.pow(self.currency_decimals as u32);
        let whole = (cents / divisor).abs();
        let frac = (cents % divisor).abs();
        let sign = if cents < 0 { "-" } else { "" };

        if self.currency_decimals == 0 {
            format!("{}{}{}", sign, self.currency_symbol, whole)
        } else {
            format!(
                "{}{}{}.{:0width$}",
                sign,
                self.currency_symbol,
                whole,
                frac,
                width = self.currency_decimals as usize
            )
        }
    }
}
