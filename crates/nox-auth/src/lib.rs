//! # nox-auth: Account Sessions for the Nox Storefront
//!
//! A facade over an external identity provider. The provider itself (a
//! hosted auth service) is reached through the [`IdentityProvider`] trait;
//! its wire protocol is out of scope.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          nox-auth                                       │
//! │                                                                         │
//! │  form submit                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌───────────────────────────────────────────────────────────────┐     │
//! │  │                       AuthFacade                               │     │
//! │  │                                                               │     │
//! │  │  1. RateLimiter (signup_/login_ + client id)   ← advisory     │     │
//! │  │  2. validate_email / validate_password         ← nox-core     │     │
//! │  │  3. secure_delay (100-300 ms)                  ← timing.rs    │     │
//! │  │  4. provider call                                             │     │
//! │  │  5. ProviderError code → user copy             ← messages.rs  │     │
//! │  │                                                               │     │
//! │  │  cached AuthState { current_user, loading, last_error }       │     │
//! │  │        ▲                                                      │     │
//! │  │        └── listener task ◄── broadcast::Receiver<SessionEvent>│     │
//! │  └───────────────────────────────────────────────────────────────┘     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - `auth.toml` + `NOX_*` environment overrides
//! - [`error`] - Auth error types
//! - [`facade`] - `AuthFacade` and its cached state
//! - [`messages`] - User-facing copy for provider failures
//! - [`provider`] - The `IdentityProvider` trait and identity types
//! - [`timing`] - Random delays and secure tokens
//! - `testing` - `MockIdentityProvider` (feature `test-util`)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nox_auth::{AuthConfig, AuthFacade};
//!
//! let config = AuthConfig::load_or_default(None);
//! let auth = AuthFacade::start(Arc::new(provider), config, user_agent).await;
//!
//! auth.sign_in("molly@sprawl.net", "Razor!Girl1").await?;
//! assert!(auth.is_authenticated().await);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod facade;
pub mod messages;
pub mod provider;
pub mod timing;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use facade::{AuthFacade, AuthState};
pub use provider::{
    IdentityProvider, ProviderError, ProviderErrorCode, ProviderResult, Session, SessionEvent,
    SessionEventKind, SignUpOptions, SignUpResponse, User, UserUpdate,
};
pub use timing::{generate_secure_token, secure_delay};

#[cfg(any(test, feature = "test-util"))]
pub use testing::MockIdentityProvider;
