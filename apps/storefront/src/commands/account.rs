//! # Account Commands
//!
//! Sign-up, sign-in and the profile/security tabs of the dashboard.
//!
//! ## Layering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Command (this file)           │  AuthFacade (nox-auth)                 │
//! │  ──────────────────────────────┼──────────────────────────────────────  │
//! │  automated user agent? ──► 403 │  rate limit per install                │
//! │  form throttle per agent ► 429 │  email / password rules                │
//! │  form fields present           │                                        │
//! │  name, phone, address rules    │  random delay                          │
//! │  password == confirmation      │  provider call, error remapping        │
//! │  sanitize free text            │  cached user / session events          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The facade is shared, so every command takes `&AuthFacade<P>`. The two
//! form commands also take the [`FormThrottle`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use nox_auth::messages::INVALID_EMAIL;
use nox_auth::{AuthFacade, AuthState, IdentityProvider, User};
use nox_core::validation::{
    looks_automated, sanitize_input, validate_address, validate_email, validate_name,
    validate_password, validate_phone_number,
};
use nox_core::{password_strength, PasswordStrength, ValidationError};

use crate::error::{ApiError, ErrorCode};
use crate::state::FormThrottle;

// =============================================================================
// Request / Response Types
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignUpRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpResult {
    pub email: String,
    /// True when the account waits on the confirmation email.
    pub needs_confirmation: bool,
}

/// The profile tab. Empty phone and address are allowed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileUpdate {
    pub full_name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub zip_code: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangePasswordRequest {
    pub new_password: String,
    pub confirm_password: String,
}

// =============================================================================
// Commands
// =============================================================================

/// Creates an account.
///
/// ## Checks (first failure wins)
/// 1. Automated user agent
/// 2. Form throttle (2 submits per 10 minutes per user agent)
/// 3. Full name
/// 4. Email present, then well formed
/// 5. Password rules
/// 6. Password confirmation
pub async fn sign_up<P: IdentityProvider>(
    auth: &AuthFacade<P>,
    throttle: &FormThrottle,
    user_agent: &str,
    request: &SignUpRequest,
) -> Result<SignUpResult, ApiError> {
    debug!("sign_up command");
    reject_automated(user_agent)?;
    throttle.check_signup(user_agent)?;

    validate_name(&request.full_name).into_result("fullName")?;

    let email = request.email.trim();
    if email.is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    if !validate_email(email) {
        return Err(ApiError::validation(INVALID_EMAIL));
    }

    validate_password(&request.password).into_result("password")?;
    if request.password != request.confirm_password {
        return Err(ValidationError::Mismatch("Passwords".into()).into());
    }

    let mut profile = Map::new();
    profile.insert(
        "full_name".into(),
        Value::String(sanitize_input(&request.full_name)),
    );

    let response = auth.sign_up(email, &request.password, profile).await?;

    Ok(SignUpResult {
        email: email.to_string(),
        needs_confirmation: response.session.is_none(),
    })
}

/// Signs in. Returns the signed-in user.
///
/// Automated agents are refused first, then the form throttle (3 submits
/// per 5 minutes per user agent) is counted before any field is checked.
pub async fn sign_in<P: IdentityProvider>(
    auth: &AuthFacade<P>,
    throttle: &FormThrottle,
    user_agent: &str,
    email: &str,
    password: &str,
) -> Result<User, ApiError> {
    debug!("sign_in command");
    reject_automated(user_agent)?;
    throttle.check_login(user_agent)?;

    if email.trim().is_empty() || password.is_empty() {
        return Err(ApiError::validation("Please fill in all fields"));
    }

    let session = auth.sign_in(email.trim(), password).await?;
    Ok(session.user)
}

pub async fn sign_out<P: IdentityProvider>(auth: &AuthFacade<P>) -> Result<(), ApiError> {
    debug!("sign_out command");
    auth.sign_out().await?;
    Ok(())
}

/// Saves the profile tab.
///
/// Name, phone and address are validated; every free-text field is
/// sanitized. The phone number is stored in its cleaned form.
pub async fn update_profile<P: IdentityProvider>(
    auth: &AuthFacade<P>,
    update: &ProfileUpdate,
) -> Result<User, ApiError> {
    debug!("update_profile command");

    validate_name(&update.full_name).into_result("fullName")?;
    let phone = validate_phone_number(&update.phone).into_result("phone")?;
    validate_address(&update.address).into_result("address")?;

    let mut data = Map::new();
    for (key, value) in [
        ("full_name", sanitize_input(&update.full_name)),
        ("phone", phone.unwrap_or_default()),
        ("address", sanitize_input(&update.address)),
        ("city", sanitize_input(&update.city)),
        ("zip_code", sanitize_input(&update.zip_code)),
    ] {
        data.insert(key.to_string(), Value::String(value));
    }

    Ok(auth.update_profile(data).await?)
}

/// Sets a new password for the signed-in user.
pub async fn change_password<P: IdentityProvider>(
    auth: &AuthFacade<P>,
    request: &ChangePasswordRequest,
) -> Result<(), ApiError> {
    debug!("change_password command");

    validate_password(&request.new_password).into_result("newPassword")?;
    if request.new_password != request.confirm_password {
        return Err(ValidationError::Mismatch("Passwords".into()).into());
    }

    auth.update_password(&request.new_password).await?;
    Ok(())
}

/// Strength meter under the password field.
pub fn password_feedback(password: &str) -> PasswordStrength {
    password_strength(password)
}

/// Sends a reset link. Unknown addresses succeed too.
pub async fn reset_password<P: IdentityProvider>(
    auth: &AuthFacade<P>,
    email: &str,
) -> Result<(), ApiError> {
    debug!("reset_password command");

    let email = email.trim();
    if !validate_email(email) {
        return Err(ApiError::validation(INVALID_EMAIL));
    }
    auth.reset_password(email).await?;
    Ok(())
}

/// Re-sends the confirmation email from the sign-in page.
pub async fn resend_confirmation<P: IdentityProvider>(
    auth: &AuthFacade<P>,
    email: &str,
) -> Result<(), ApiError> {
    debug!("resend_confirmation command");

    let email = email.trim();
    if email.is_empty() {
        return Err(ApiError::validation("Please enter your email address first"));
    }
    auth.resend_confirmation(email).await?;
    Ok(())
}

/// Snapshot for route guards and the navbar.
pub async fn get_session<P: IdentityProvider>(auth: &AuthFacade<P>) -> AuthState {
    auth.state().await
}

// =============================================================================
// Helpers
// =============================================================================

fn reject_automated(user_agent: &str) -> Result<(), ApiError> {
    if looks_automated(user_agent) {
        warn!("Rejected automated client");
        return Err(ApiError::new(ErrorCode::AccessDenied, "Access denied"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nox_auth::testing::{EmailKind, MockOp};
    use nox_auth::{AuthConfig, MockIdentityProvider};
    use nox_core::StrengthLevel;
    use std::sync::Arc;

    const BROWSER: &str = "Mozilla/5.0 (X11; Linux x86_64) Firefox/130.0";
    const STRONG: &str = "Neon!Tubes2077";

    async fn facade(provider: MockIdentityProvider) -> (Arc<MockIdentityProvider>, AuthFacade<MockIdentityProvider>) {
        let provider = Arc::new(provider);
        let auth = AuthFacade::start(
            Arc::clone(&provider),
            AuthConfig::default().without_delays(),
            BROWSER,
        )
        .await;
        (provider, auth)
    }

    fn signup(name: &str, email: &str, password: &str, confirm: &str) -> SignUpRequest {
        SignUpRequest {
            full_name: name.into(),
            email: email.into(),
            password: password.into(),
            confirm_password: confirm.into(),
        }
    }

    #[tokio::test]
    async fn test_sign_up_sends_confirmation() {
        let (provider, auth) = facade(MockIdentityProvider::new()).await;

        let throttle = FormThrottle::new();
        let result = sign_up(&auth, &throttle, BROWSER, &signup(" Molly Millions ", "molly@sprawl.net", STRONG, STRONG))
            .await
            .unwrap();
        assert!(result.needs_confirmation);
        assert_eq!(result.email, "molly@sprawl.net");

        let user = provider.user("molly@sprawl.net").unwrap();
        assert_eq!(user.full_name(), Some("Molly Millions"));

        let emails = provider.sent_emails();
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0].kind, EmailKind::Confirmation);
    }

    #[tokio::test]
    async fn test_sign_up_form_errors_in_order() {
        let (provider, auth) = facade(MockIdentityProvider::new()).await;

        // A fresh throttle per submit keeps the form limit out of the way.
        let auth = &auth;
        let submit = move |request: SignUpRequest| async move {
            sign_up(auth, &FormThrottle::new(), BROWSER, &request).await
        };

        let err = submit(signup("", "", "", "")).await.unwrap_err();
        assert_eq!(err.message, "Name is required");

        let err = submit(signup("Molly", "  ", "", "")).await.unwrap_err();
        assert_eq!(err.message, "Email is required");

        let err = submit(signup("Molly", "molly@", "", "")).await.unwrap_err();
        assert_eq!(err.message, INVALID_EMAIL);

        let err = submit(signup("Molly", "molly@sprawl.net", "short", "")).await.unwrap_err();
        assert_eq!(err.message, "Password must be at least 8 characters long");

        let err = submit(signup("Molly", "molly@sprawl.net", STRONG, "Other!Pass99"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "Passwords do not match");

        assert!(provider.user("molly@sprawl.net").is_none());
    }

    #[tokio::test]
    async fn test_automated_agents_denied() {
        let (_, auth) = facade(MockIdentityProvider::new().with_user("a@b.io", STRONG, true)).await;

        let throttle = FormThrottle::new();
        let err = sign_in(&auth, &throttle, "python-requests/2.31", "a@b.io", STRONG)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AccessDenied);
        assert_eq!(err.message, "Access denied");
        assert!(!auth.is_authenticated().await);

        let err = sign_up(&auth, &throttle, "curl/8.4.0", &signup("Bot", "bot@b.io", STRONG, STRONG))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AccessDenied);
    }

    #[tokio::test]
    async fn test_third_sign_up_submit_is_throttled() {
        let (provider, auth) = facade(MockIdentityProvider::new()).await;
        let throttle = FormThrottle::new();

        // Invalid submits count too.
        let err = sign_up(&auth, &throttle, BROWSER, &signup("", "", "", "")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        sign_up(&auth, &throttle, BROWSER, &signup("Molly", "molly@sprawl.net", STRONG, STRONG))
            .await
            .unwrap();

        let err = sign_up(&auth, &throttle, BROWSER, &signup("Armitage", "armitage@sprawl.net", STRONG, STRONG))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RateLimited);
        assert_eq!(err.message, "Too many signup attempts. Please wait 10 minutes.");
        assert!(provider.user("armitage@sprawl.net").is_none());
    }

    #[tokio::test]
    async fn test_fourth_sign_in_submit_is_throttled() {
        let (provider, auth) = facade(MockIdentityProvider::new().with_user("case@chiba.jp", STRONG, true)).await;
        let throttle = FormThrottle::new();

        let err = sign_in(&auth, &throttle, BROWSER, "", "").await.unwrap_err();
        assert_eq!(err.message, "Please fill in all fields");
        for _ in 0..2 {
            sign_in(&auth, &throttle, BROWSER, "case@chiba.jp", "Wrong!Pass1")
                .await
                .unwrap_err();
        }

        // Even the right password waits out the form window.
        let err = sign_in(&auth, &throttle, BROWSER, "case@chiba.jp", STRONG)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RateLimited);
        assert_eq!(err.message, "Too many attempts. Please wait 5 minutes.");
        assert_eq!(provider.call_count(MockOp::SignIn), 2);
        assert!(!auth.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let (_, auth) = facade(MockIdentityProvider::new().with_user("case@chiba.jp", STRONG, true)).await;

        let throttle = FormThrottle::new();
        let err = sign_in(&auth, &throttle, BROWSER, "case@chiba.jp", "").await.unwrap_err();
        assert_eq!(err.message, "Please fill in all fields");

        let user = sign_in(&auth, &throttle, BROWSER, "case@chiba.jp", STRONG).await.unwrap();
        assert_eq!(user.email, "case@chiba.jp");
        assert!(get_session(&auth).await.is_authenticated());

        sign_out(&auth).await.unwrap();
        assert!(!get_session(&auth).await.is_authenticated());
    }

    #[tokio::test]
    async fn test_wrong_password_is_generic() {
        let (_, auth) = facade(MockIdentityProvider::new().with_user("case@chiba.jp", STRONG, true)).await;

        let throttle = FormThrottle::new();
        let wrong = sign_in(&auth, &throttle, BROWSER, "case@chiba.jp", "Wrong!Pass1")
            .await
            .unwrap_err();
        let unknown = sign_in(&auth, &throttle, BROWSER, "nobody@chiba.jp", STRONG)
            .await
            .unwrap_err();
        assert_eq!(wrong.code, ErrorCode::AuthError);
        assert_eq!(wrong.message, unknown.message);
    }

    #[tokio::test]
    async fn test_update_profile_sanitizes() {
        let provider = MockIdentityProvider::new()
            .with_user("case@chiba.jp", STRONG, true)
            .with_session_for("case@chiba.jp");
        let (_, auth) = facade(provider).await;

        let user = update_profile(
            &auth,
            &ProfileUpdate {
                full_name: "Henry Case".into(),
                phone: "(555) 123-4567".into(),
                address: "<b>Cheap Hotel</b>".into(),
                city: "Chiba".into(),
                zip_code: "90210".into(),
            },
        )
        .await
        .unwrap();

        assert_eq!(user.user_metadata["phone"], "5551234567");
        assert_eq!(user.user_metadata["address"], "&lt;b&gt;Cheap Hotel&lt;/b&gt;");
        assert_eq!(auth.current_user().await.unwrap().full_name(), Some("Henry Case"));
    }

    #[tokio::test]
    async fn test_update_profile_rejects_bad_phone() {
        let provider = MockIdentityProvider::new()
            .with_user("case@chiba.jp", STRONG, true)
            .with_session_for("case@chiba.jp");
        let (_, auth) = facade(provider).await;

        let err = update_profile(
            &auth,
            &ProfileUpdate {
                full_name: "Henry Case".into(),
                phone: "12345".into(),
                ..ProfileUpdate::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.message, "Invalid phone number format");
    }

    #[tokio::test]
    async fn test_change_password() {
        let provider = MockIdentityProvider::new()
            .with_user("case@chiba.jp", STRONG, true)
            .with_session_for("case@chiba.jp");
        let (provider, auth) = facade(provider).await;

        let mismatch = ChangePasswordRequest {
            new_password: "Fresh!Ice2084".into(),
            confirm_password: "Fresh!Ice2085".into(),
        };
        assert_eq!(
            change_password(&auth, &mismatch).await.unwrap_err().message,
            "Passwords do not match"
        );

        let request = ChangePasswordRequest {
            new_password: "Fresh!Ice2084".into(),
            confirm_password: "Fresh!Ice2084".into(),
        };
        change_password(&auth, &request).await.unwrap();
        assert_eq!(provider.password_of("case@chiba.jp").as_deref(), Some("Fresh!Ice2084"));
    }

    #[tokio::test]
    async fn test_reset_and_resend_checks() {
        let provider = MockIdentityProvider::new().with_user("case@chiba.jp", STRONG, false);
        let (provider, auth) = facade(provider).await;

        assert_eq!(
            reset_password(&auth, "nope").await.unwrap_err().message,
            INVALID_EMAIL
        );
        assert_eq!(
            resend_confirmation(&auth, " ").await.unwrap_err().message,
            "Please enter your email address first"
        );

        reset_password(&auth, "case@chiba.jp").await.unwrap();
        resend_confirmation(&auth, "case@chiba.jp").await.unwrap();

        let kinds: Vec<_> = provider.sent_emails().into_iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EmailKind::PasswordReset, EmailKind::Confirmation]);
    }

    #[test]
    fn test_password_feedback() {
        assert_eq!(password_feedback("").level, StrengthLevel::Empty);
        assert_eq!(password_feedback(STRONG).level, StrengthLevel::Strong);
    }
}
