//! # Auth Error Types
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Auth Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Local          │  │  Throttle       │  │  Remote                 │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Validation     │  │  RateLimited    │  │  Provider {code, msg}   │ │
//! │  │  (before any    │  │  (advisory,     │  │  (already remapped to   │ │
//! │  │   network call) │  │   client-side)  │  │   user-facing copy)     │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐                                                   │
//! │  │  Config         │  Bad auth.toml / environment values               │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every message carried by an `AuthError` is safe to show to the user.

use thiserror::Error;

use crate::provider::ProviderErrorCode;

/// Result type alias for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth facade error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Too many attempts for this client in the current window.
    #[error("{message}")]
    RateLimited {
        message: String,
        retry_after_secs: u64,
    },

    /// Input rejected locally; the provider was never called.
    #[error("{0}")]
    Validation(String),

    /// The provider refused the call. `message` is user-facing copy.
    #[error("{message}")]
    Provider {
        code: ProviderErrorCode,
        message: String,
    },

    /// Invalid auth configuration.
    #[error("Invalid auth configuration: {0}")]
    Config(String),
}

impl AuthError {
    pub fn validation(message: impl Into<String>) -> Self {
        AuthError::Validation(message.into())
    }

    pub fn provider(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        AuthError::Provider {
            code,
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for AuthError {
    fn from(err: std::io::Error) -> Self {
        AuthError::Config(err.to_string())
    }
}

impl From<toml::de::Error> for AuthError {
    fn from(err: toml::de::Error) -> Self {
        AuthError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for AuthError {
    fn from(err: toml::ser::Error) -> Self {
        AuthError::Config(err.to_string())
    }
}
