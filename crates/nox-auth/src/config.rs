//! # Auth Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     NOX_SITE_URL=https://nox.example                                   │
//! │     NOX_LOGIN_MAX_ATTEMPTS=5                                           │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/nox-storefront/auth.toml (Linux)                         │
//! │     ~/Library/Application Support/io.nox.nox-storefront/auth.toml      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # auth.toml
//! [site]
//! url = "https://nox.example"
//!
//! [rate_limit]
//! signup_max_attempts = 3
//! signup_window_secs = 60
//! login_max_attempts = 5
//! login_window_secs = 900
//!
//! [timing]
//! min_delay_ms = 100
//! max_delay_ms = 300
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{AuthError, AuthResult};

/// Longest accepted rate-limit window (one day).
pub const MAX_WINDOW_SECS: u64 = 24 * 60 * 60;

// =============================================================================
// Site
// =============================================================================

/// Public site settings used to build redirect links in auth emails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSettings {
    /// Origin of the storefront, without a trailing slash.
    #[serde(default = "default_site_url")]
    pub url: String,
}

fn default_site_url() -> String {
    "http://localhost:5173".to_string()
}

impl Default for SiteSettings {
    fn default() -> Self {
        SiteSettings {
            url: default_site_url(),
        }
    }
}

// =============================================================================
// Rate Limits
// =============================================================================

/// Attempt budgets for the auth forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSettings {
    #[serde(default = "default_signup_max")]
    pub signup_max_attempts: u32,

    #[serde(default = "default_signup_window")]
    pub signup_window_secs: u64,

    #[serde(default = "default_login_max")]
    pub login_max_attempts: u32,

    /// Default: 15 minutes
    #[serde(default = "default_login_window")]
    pub login_window_secs: u64,
}

fn default_signup_max() -> u32 {
    3
}
fn default_signup_window() -> u64 {
    60
}
fn default_login_max() -> u32 {
    5
}
fn default_login_window() -> u64 {
    15 * 60
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        RateLimitSettings {
            signup_max_attempts: default_signup_max(),
            signup_window_secs: default_signup_window(),
            login_max_attempts: default_login_max(),
            login_window_secs: default_login_window(),
        }
    }
}

// =============================================================================
// Timing
// =============================================================================

/// Bounds of the random delay inserted around credential calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingSettings {
    #[serde(default = "default_min_delay")]
    pub min_delay_ms: u64,

    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,
}

fn default_min_delay() -> u64 {
    100
}
fn default_max_delay() -> u64 {
    300
}

impl Default for TimingSettings {
    fn default() -> Self {
        TimingSettings {
            min_delay_ms: default_min_delay(),
            max_delay_ms: default_max_delay(),
        }
    }
}

// =============================================================================
// AuthConfig
// =============================================================================

/// Complete auth configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub site: SiteSettings,

    #[serde(default)]
    pub rate_limit: RateLimitSettings,

    #[serde(default)]
    pub timing: TimingSettings,
}

impl AuthConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (auth.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> AuthResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading auth config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Auth config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load auth config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> AuthResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| AuthError::Config("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Auth config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AuthResult<()> {
        let url = &self.site.url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(AuthError::Config(format!(
                "Site URL must start with http:// or https://, got: {}",
                url
            )));
        }

        let limits = &self.rate_limit;
        if limits.signup_max_attempts == 0 || limits.login_max_attempts == 0 {
            return Err(AuthError::Config(
                "max_attempts must be greater than 0".into(),
            ));
        }
        if limits.signup_window_secs == 0 || limits.login_window_secs == 0 {
            return Err(AuthError::Config(
                "window_secs must be greater than 0".into(),
            ));
        }
        let longest = limits.signup_window_secs.max(limits.login_window_secs);
        if longest > MAX_WINDOW_SECS {
            return Err(AuthError::Config(format!(
                "window_secs ({}) exceeds {} seconds",
                longest, MAX_WINDOW_SECS
            )));
        }

        if self.timing.min_delay_ms > self.timing.max_delay_ms {
            return Err(AuthError::Config(format!(
                "min_delay_ms ({}) exceeds max_delay_ms ({})",
                self.timing.min_delay_ms, self.timing.max_delay_ms
            )));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("NOX_SITE_URL") {
            debug!(url = %url, "Overriding site URL from environment");
            self.site.url = url;
        }

        override_parsed("NOX_SIGNUP_MAX_ATTEMPTS", &mut self.rate_limit.signup_max_attempts);
        override_parsed("NOX_SIGNUP_WINDOW_SECS", &mut self.rate_limit.signup_window_secs);
        override_parsed("NOX_LOGIN_MAX_ATTEMPTS", &mut self.rate_limit.login_max_attempts);
        override_parsed("NOX_LOGIN_WINDOW_SECS", &mut self.rate_limit.login_window_secs);
        override_parsed("NOX_AUTH_MIN_DELAY_MS", &mut self.timing.min_delay_ms);
        override_parsed("NOX_AUTH_MAX_DELAY_MS", &mut self.timing.max_delay_ms);
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("io", "nox", "nox-storefront")
            .map(|dirs| dirs.config_dir().join("auth.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Origin without a trailing slash.
    pub fn site_url(&self) -> &str {
        self.site.url.trim_end_matches('/')
    }

    /// Link sent in password-reset emails.
    pub fn reset_password_url(&self) -> String {
        format!("{}/reset-password", self.site_url())
    }

    /// Link sent in sign-up confirmation emails.
    pub fn email_confirmed_url(&self) -> String {
        format!("{}/email-confirmed", self.site_url())
    }

    pub fn signup_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit.signup_window_secs)
    }

    pub fn login_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit.login_window_secs)
    }

    pub fn delay_bounds(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.timing.min_delay_ms),
            Duration::from_millis(self.timing.max_delay_ms),
        )
    }

    /// A config with no timing delay, for tests and local tooling.
    pub fn without_delays(mut self) -> Self {
        self.timing.min_delay_ms = 0;
        self.timing.max_delay_ms = 0;
        self
    }
}

fn override_parsed<T: std::str::FromStr>(var: &str, target: &mut T) {
    if let Ok(raw) = std::env::var(var) {
        match raw.parse::<T>() {
            Ok(value) => *target = value,
            Err(_) => warn!(var = %var, value = %raw, "Ignoring unparsable environment override"),
        }
    }
}
