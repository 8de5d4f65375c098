//! # User-Facing Auth Messages
//!
//! Maps structured provider failures onto the copy shown in the forms.
//!
//! ```text
//! ProviderError { code, message }
//!        │
//!        ▼
//! sign_up_message / sign_in_message        (keyed on code, never on text)
//!        │
//!        ▼
//! AuthError::Provider { code, message: <copy below> }
//! ```
//!
//! Credential failures (invalid credentials, unknown user, wrong password)
//! share one message so the form never reveals which half was wrong.

use crate::provider::{ProviderError, ProviderErrorCode};

pub const SIGNUP_RATE_LIMITED: &str = "Too many signup attempts. Please wait before trying again.";
pub const LOGIN_RATE_LIMITED: &str = "Too many login attempts. Please wait before trying again.";
pub const INVALID_EMAIL: &str = "Please enter a valid email address";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const SIGN_IN_FAILED: &str = "Failed to sign in. Please try again.";

pub const SIGNUP_FAILED: &str = "Signup failed";
pub const USER_ALREADY_EXISTS: &str =
    "An account with this email already exists. Please sign in instead.";
pub const SIGNUP_DISABLED: &str = "New account registration is currently disabled.";
pub const WEAK_PASSWORD: &str = "Password does not meet the security requirements";

pub const EMAIL_NOT_CONFIRMED: &str =
    "Your email has not been confirmed. Please check your inbox for the confirmation link.";
pub const NETWORK_ERROR: &str = "Network error. Please check your connection and try again.";
pub const PROVIDER_RATE_LIMITED: &str = "Too many requests. Please wait before trying again.";

pub const SIGN_OUT_FAILED: &str = "Sign out failed";
pub const PASSWORD_RESET_FAILED: &str = "Password reset failed";
pub const PASSWORD_UPDATE_FAILED: &str = "Password update failed";
pub const PROFILE_UPDATE_FAILED: &str = "Profile update failed";
pub const RESEND_FAILED: &str = "Failed to resend confirmation email";
pub const INIT_FAILED: &str = "Authentication initialization failed";

/// Copy for a failed sign-up.
///
/// Unknown failures pass the provider's text through, falling back to a
/// generic message when it is empty.
pub fn sign_up_message(err: &ProviderError) -> String {
    match err.code {
        ProviderErrorCode::UserAlreadyExists => USER_ALREADY_EXISTS.into(),
        ProviderErrorCode::SignupDisabled => SIGNUP_DISABLED.into(),
        ProviderErrorCode::WeakPassword => WEAK_PASSWORD.into(),
        ProviderErrorCode::Network => NETWORK_ERROR.into(),
        ProviderErrorCode::RateLimited => PROVIDER_RATE_LIMITED.into(),
        _ if err.message.trim().is_empty() => SIGNUP_FAILED.into(),
        _ => err.message.clone(),
    }
}

/// Copy for a failed sign-in. Provider text is never shown here.
pub fn sign_in_message(err: &ProviderError) -> String {
    match err.code {
        code if code.is_credential_error() => INVALID_CREDENTIALS.into(),
        ProviderErrorCode::EmailNotConfirmed => EMAIL_NOT_CONFIRMED.into(),
        ProviderErrorCode::Network => NETWORK_ERROR.into(),
        ProviderErrorCode::RateLimited => PROVIDER_RATE_LIMITED.into(),
        _ => SIGN_IN_FAILED.into(),
    }
}

/// Local rate-limit rejection with a wait estimate in whole minutes.
pub fn rate_limited_message(base: &str, retry_after_secs: u64) -> String {
    let minutes = retry_after_secs.div_ceil(60).max(1);
    let unit = if minutes == 1 { "minute" } else { "minutes" };
    let base = base.trim_end_matches('.');
    format!("{} (about {} {}).", base, minutes, unit)
}
