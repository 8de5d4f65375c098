//! # Identity Provider
//!
//! The seam between the storefront and the hosted identity service.
//!
//! ## Consumed Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     IdentityProvider (trait)                            │
//! │                                                                         │
//! │  get_session()                         → Option<Session>               │
//! │  subscribe()                           → broadcast::Receiver<Event>    │
//! │  sign_up(email, pw, {data, redirect})  → SignUpResponse                │
//! │  sign_in_with_password(email, pw)      → Session                       │
//! │  sign_out()                                                            │
//! │  reset_password_for_email(email, redirect)                             │
//! │  update_user({password?, data?})       → User                          │
//! │  resend_signup(email, redirect)                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Failures carry a structured [`ProviderErrorCode`]. Adapters map the
//! service's own error identifiers onto these codes; nothing downstream
//! matches on message text.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::broadcast;

// =============================================================================
// Identity Types
// =============================================================================

/// A user as reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub email_confirmed_at: Option<DateTime<Utc>>,
    /// Free-form profile fields (`full_name`, ...).
    #[serde(default)]
    pub user_metadata: Map<String, Value>,
}

impl User {
    pub fn is_email_confirmed(&self) -> bool {
        self.email_confirmed_at.is_some()
    }

    /// Display name from profile data, if set.
    pub fn full_name(&self) -> Option<&str> {
        self.user_metadata.get("full_name").and_then(Value::as_str)
    }
}

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub user: User,
}

/// Why the session changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionEventKind {
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
    PasswordRecovery,
}

/// Pushed by the provider whenever the session changes.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionEvent {
    pub kind: SessionEventKind,
    pub session: Option<Session>,
}

impl SessionEvent {
    pub fn signed_in(session: Session) -> Self {
        SessionEvent {
            kind: SessionEventKind::SignedIn,
            session: Some(session),
        }
    }

    pub fn signed_out() -> Self {
        SessionEvent {
            kind: SessionEventKind::SignedOut,
            session: None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }
}

// =============================================================================
// Requests & Responses
// =============================================================================

/// Extra sign-up parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignUpOptions {
    /// Profile fields stored on the new user.
    pub data: Map<String, Value>,
    /// Where the confirmation email links to.
    pub redirect_to: Option<String>,
}

/// Result of a sign-up. `session` is `None` while the email awaits
/// confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpResponse {
    pub user: Option<User>,
    pub session: Option<Session>,
}

/// Changes to the current user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserUpdate {
    pub password: Option<String>,
    pub data: Option<Map<String, Value>>,
}

impl UserUpdate {
    pub fn password(password: impl Into<String>) -> Self {
        UserUpdate {
            password: Some(password.into()),
            data: None,
        }
    }

    pub fn data(data: Map<String, Value>) -> Self {
        UserUpdate {
            password: None,
            data: Some(data),
        }
    }
}

// =============================================================================
// Provider Errors
// =============================================================================

/// Structured provider failure codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorCode {
    UserAlreadyExists,
    SignupDisabled,
    EmailNotConfirmed,
    InvalidCredentials,
    UserNotFound,
    WrongPassword,
    Network,
    WeakPassword,
    RateLimited,
    Other,
}

impl ProviderErrorCode {
    /// Codes that concern a credential pair. Their copy must not reveal
    /// which half was wrong.
    pub fn is_credential_error(&self) -> bool {
        matches!(
            self,
            ProviderErrorCode::InvalidCredentials
                | ProviderErrorCode::UserNotFound
                | ProviderErrorCode::WrongPassword
        )
    }
}

impl std::fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ProviderErrorCode::UserAlreadyExists => "user_already_exists",
            ProviderErrorCode::SignupDisabled => "signup_disabled",
            ProviderErrorCode::EmailNotConfirmed => "email_not_confirmed",
            ProviderErrorCode::InvalidCredentials => "invalid_credentials",
            ProviderErrorCode::UserNotFound => "user_not_found",
            ProviderErrorCode::WrongPassword => "wrong_password",
            ProviderErrorCode::Network => "network",
            ProviderErrorCode::WeakPassword => "weak_password",
            ProviderErrorCode::RateLimited => "rate_limited",
            ProviderErrorCode::Other => "other",
        };
        write!(f, "{}", s)
    }
}

/// A raw provider failure. The message is the provider's own text and is
/// never shown to users directly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct ProviderError {
    pub code: ProviderErrorCode,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        ProviderError {
            code,
            message: message.into(),
        }
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

// =============================================================================
// The Trait
// =============================================================================

/// An external identity service.
pub trait IdentityProvider: Send + Sync + 'static {
    /// The session restored from the provider's own storage, if any.
    fn get_session(&self) -> impl Future<Output = ProviderResult<Option<Session>>> + Send;

    /// Registers for session-change events. Dropping the receiver
    /// unsubscribes.
    fn subscribe(&self) -> broadcast::Receiver<SessionEvent>;

    fn sign_up(
        &self,
        email: &str,
        password: &str,
        options: SignUpOptions,
    ) -> impl Future<Output = ProviderResult<SignUpResponse>> + Send;

    fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = ProviderResult<Session>> + Send;

    fn sign_out(&self) -> impl Future<Output = ProviderResult<()>> + Send;

    fn reset_password_for_email(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> impl Future<Output = ProviderResult<()>> + Send;

    fn update_user(&self, update: UserUpdate) -> impl Future<Output = ProviderResult<User>> + Send;

    fn resend_signup(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> impl Future<Output = ProviderResult<()>> + Send;
}
