//! # Auth Session Facade
//!
//! Wraps an [`IdentityProvider`] with local validation, advisory rate
//! limiting, timing mitigation and user-facing error copy, and caches the
//! current session for the views.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        AuthFacade Lifecycle                             │
//! │                                                                         │
//! │  AuthFacade::start(provider, config, client_id)                        │
//! │       │                                                                 │
//! │       ├── provider.subscribe()   ← registered first, no event is lost  │
//! │       ├── provider.get_session() ← seeds current_user                  │
//! │       └── spawn listener ────────────────────────┐                     │
//! │                                                  ▼                     │
//! │                                    every SessionEvent:                 │
//! │                                      current_user = event.user         │
//! │                                      loading = false, error = None     │
//! │                                                                         │
//! │  shutdown() / drop  ── aborts the listener (unsubscribes)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Per-Call State Machine
//! ```text
//!   Idle ──► Loading ──► Success ──► Idle
//!                  └───► Failure ──► Idle   (last_error = user-facing copy)
//! ```
//!
//! Calls are expected to be serialized by the caller (the form disables its
//! submit button while a call is in flight). Nothing here cancels an
//! in-flight provider call.

use std::future::Future;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use nox_core::rate_limit::{Clock, RateLimiter, SystemClock};
use nox_core::validation::{validate_email, validate_password};

use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};
use crate::messages;
use crate::provider::{
    IdentityProvider, ProviderError, Session, SessionEvent, SignUpOptions, SignUpResponse, User,
    UserUpdate,
};
use crate::timing::secure_delay;

/// Minimum password length accepted by the sign-in form.
pub const MIN_SIGN_IN_PASSWORD_LENGTH: usize = 6;

/// Snapshot of the cached session state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub current_user: Option<User>,
    pub loading: bool,
    pub last_error: Option<String>,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }
}

// =============================================================================
// AuthFacade
// =============================================================================

/// Session facade. Construct one per process with [`AuthFacade::start`] and
/// share it behind an `Arc`.
pub struct AuthFacade<P: IdentityProvider> {
    provider: Arc<P>,
    config: AuthConfig,
    client_id: String,
    state: Arc<RwLock<AuthState>>,
    limiter: Mutex<RateLimiter>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl<P: IdentityProvider> AuthFacade<P> {
    /// Starts the facade using the wall clock for rate limiting.
    ///
    /// `client_id` names this install (`NOX_CLIENT_ID`) and is the only
    /// component of the facade's rate-limit keys (`login_<client_id>`,
    /// `signup_<client_id>`). It is fixed for the facade's lifetime, so every
    /// account tried through one facade draws from the same window. Per-request
    /// throttling by user agent belongs to the caller. The id is
    /// client-supplied, so the limits are advisory only.
    pub async fn start(provider: Arc<P>, config: AuthConfig, client_id: impl Into<String>) -> Self {
        Self::start_with_clock(provider, config, client_id, Arc::new(SystemClock)).await
    }

    /// Starts the facade with an explicit rate-limit clock.
    pub async fn start_with_clock(
        provider: Arc<P>,
        config: AuthConfig,
        client_id: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let client_id = client_id.into();
        let client_id = if client_id.trim().is_empty() {
            "unknown".to_string()
        } else {
            client_id
        };

        let events = provider.subscribe();

        let initial = match provider.get_session().await {
            Ok(session) => AuthState {
                current_user: session.map(|s| s.user),
                loading: false,
                last_error: None,
            },
            Err(e) => {
                warn!(code = %e.code, "Failed to restore session");
                debug!(error = %e.message, "Session restore details");
                AuthState {
                    current_user: None,
                    loading: false,
                    last_error: Some(messages::INIT_FAILED.to_string()),
                }
            }
        };

        info!(
            authenticated = initial.is_authenticated(),
            "Auth facade started"
        );

        let state = Arc::new(RwLock::new(initial));
        let listener = tokio::spawn(listen(events, Arc::clone(&state)));

        AuthFacade {
            provider,
            config,
            client_id,
            state,
            limiter: Mutex::new(RateLimiter::new(clock)),
            listener: Mutex::new(Some(listener)),
        }
    }

    /// Stops listening for session events. Idempotent.
    pub fn shutdown(&self) {
        let handle = self
            .listener
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(handle) = handle {
            handle.abort();
            info!("Auth facade stopped listening for session events");
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub async fn state(&self) -> AuthState {
        self.state.read().await.clone()
    }

    pub async fn current_user(&self) -> Option<User> {
        self.state.read().await.current_user.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub async fn last_error(&self) -> Option<String> {
        self.state.read().await.last_error.clone()
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    // =========================================================================
    // Credential Operations
    // =========================================================================

    /// Registers a new account.
    ///
    /// ## Flow
    /// 1. Rate limit (`signup_<client>`, 3 per minute by default)
    /// 2. Local email and password validation
    /// 3. Random delay, then the provider call
    /// 4. Known provider failures remapped to friendly copy
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        profile: Map<String, Value>,
    ) -> AuthResult<SignUpResponse> {
        self.run("sign_up", async {
            self.check_rate_limit(
                &format!("signup_{}", self.client_id),
                self.config.rate_limit.signup_max_attempts,
                self.config.signup_window(),
                messages::SIGNUP_RATE_LIMITED,
            )?;

            if !validate_email(email) {
                return Err(AuthError::validation(messages::INVALID_EMAIL));
            }

            let check = validate_password(password);
            if !check.is_valid {
                return Err(AuthError::Validation(
                    check.message.unwrap_or_else(|| messages::WEAK_PASSWORD.to_string()),
                ));
            }

            self.delay().await;

            let options = SignUpOptions {
                data: profile,
                redirect_to: Some(self.config.email_confirmed_url()),
            };

            let response = self
                .provider
                .sign_up(email, password, options)
                .await
                .map_err(|e| remap(&e, messages::sign_up_message(&e)))?;

            info!(
                needs_confirmation = response.session.is_none(),
                "Account created"
            );
            Ok(response)
        })
        .await
    }

    /// Signs in with email and password.
    ///
    /// Every failure, local or remote, is padded with a second random delay.
    pub async fn sign_in(&self, email: &str, password: &str) -> AuthResult<Session> {
        self.run("sign_in", async {
            let result = self.try_sign_in(email, password).await;
            if result.is_err() {
                self.delay().await;
            }
            result
        })
        .await
    }

    async fn try_sign_in(&self, email: &str, password: &str) -> AuthResult<Session> {
        self.check_rate_limit(
            &format!("login_{}", self.client_id),
            self.config.rate_limit.login_max_attempts,
            self.config.login_window(),
            messages::LOGIN_RATE_LIMITED,
        )?;

        if !validate_email(email) {
            return Err(AuthError::validation(messages::INVALID_EMAIL));
        }

        if password.chars().count() < MIN_SIGN_IN_PASSWORD_LENGTH {
            return Err(AuthError::validation(messages::INVALID_CREDENTIALS));
        }

        self.delay().await;

        let session = self
            .provider
            .sign_in_with_password(email, password)
            .await
            .map_err(|e| remap(&e, messages::sign_in_message(&e)))?;

        self.state.write().await.current_user = Some(session.user.clone());
        info!("User signed in");
        Ok(session)
    }

    pub async fn sign_out(&self) -> AuthResult<()> {
        self.run("sign_out", async {
            self.provider
                .sign_out()
                .await
                .map_err(|e| remap(&e, messages::SIGN_OUT_FAILED))?;

            self.state.write().await.current_user = None;
            info!("User signed out");
            Ok(())
        })
        .await
    }

    /// Sends a password-reset email linking to `<site>/reset-password`.
    pub async fn reset_password(&self, email: &str) -> AuthResult<()> {
        self.run("reset_password", async {
            self.provider
                .reset_password_for_email(email, &self.config.reset_password_url())
                .await
                .map_err(|e| remap(&e, messages::PASSWORD_RESET_FAILED))
        })
        .await
    }

    pub async fn update_password(&self, new_password: &str) -> AuthResult<User> {
        self.run("update_password", async {
            self.provider
                .update_user(UserUpdate::password(new_password))
                .await
                .map_err(|e| remap(&e, messages::PASSWORD_UPDATE_FAILED))
        })
        .await
    }

    /// Replaces profile fields on the current user.
    pub async fn update_profile(&self, updates: Map<String, Value>) -> AuthResult<User> {
        self.run("update_profile", async {
            let user = self
                .provider
                .update_user(UserUpdate::data(updates))
                .await
                .map_err(|e| remap(&e, messages::PROFILE_UPDATE_FAILED))?;

            self.state.write().await.current_user = Some(user.clone());
            Ok(user)
        })
        .await
    }

    /// Re-sends the sign-up confirmation email.
    pub async fn resend_confirmation(&self, email: &str) -> AuthResult<()> {
        self.run("resend_confirmation", async {
            self.provider
                .resend_signup(email, &self.config.email_confirmed_url())
                .await
                .map_err(|e| remap(&e, messages::RESEND_FAILED))
        })
        .await
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Wraps an operation in the loading/error bookkeeping.
    async fn run<T, F>(&self, op: &'static str, fut: F) -> AuthResult<T>
    where
        F: Future<Output = AuthResult<T>>,
    {
        {
            let mut state = self.state.write().await;
            state.loading = true;
            state.last_error = None;
        }

        let result = fut.await;

        let mut state = self.state.write().await;
        state.loading = false;
        if let Err(e) = &result {
            debug!(op, error = %e, "Auth operation failed");
            state.last_error = Some(e.to_string());
        }
        result
    }

    fn check_rate_limit(
        &self,
        key: &str,
        max_attempts: u32,
        window: std::time::Duration,
        message: &str,
    ) -> AuthResult<()> {
        let mut limiter = self.limiter.lock().unwrap_or_else(|e| e.into_inner());
        if limiter.is_allowed(key, max_attempts, window) {
            debug!(
                remaining = limiter.remaining_attempts(key, max_attempts),
                "Auth attempt allowed"
            );
            return Ok(());
        }

        let retry_after_secs = limiter.time_until_reset(key);
        warn!(retry_after_secs, "Auth attempt rate limited");
        Err(AuthError::RateLimited {
            message: messages::rate_limited_message(message, retry_after_secs),
            retry_after_secs,
        })
    }

    async fn delay(&self) {
        let (min, max) = self.config.delay_bounds();
        secure_delay(min, max).await;
    }
}

impl<P: IdentityProvider> Drop for AuthFacade<P> {
    fn drop(&mut self) {
        if let Some(handle) = self
            .listener
            .get_mut()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            handle.abort();
        }
    }
}

fn remap(err: &ProviderError, message: impl Into<String>) -> AuthError {
    warn!(code = %err.code, "Identity provider call failed");
    debug!(error = %err.message, "Provider error details");
    AuthError::provider(err.code, message)
}

/// Applies session events to the cached state until the channel closes.
async fn listen(mut events: broadcast::Receiver<SessionEvent>, state: Arc<RwLock<AuthState>>) {
    loop {
        match events.recv().await {
            Ok(event) => {
                debug!(kind = ?event.kind, "Session event");
                let mut state = state.write().await;
                state.current_user = event.session.map(|s| s.user);
                state.loading = false;
                state.last_error = None;
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "Session listener lagged, continuing with newest event");
            }
            Err(broadcast::error::RecvError::Closed) => {
                debug!("Session event channel closed");
                break;
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;
    use nox_core::rate_limit::ManualClock;

    use super::*;
    use crate::provider::ProviderErrorCode;
    use crate::testing::{EmailKind, MockIdentityProvider, MockOp};

    const EMAIL: &str = "molly@sprawl.net";
    const PASSWORD: &str = "Razor!Girl1";

    async fn facade_with(
        provider: MockIdentityProvider,
    ) -> (AuthFacade<MockIdentityProvider>, Arc<MockIdentityProvider>, ManualClock) {
        let provider = Arc::new(provider);
        let clock = ManualClock::new(Utc::now());
        let facade = AuthFacade::start_with_clock(
            Arc::clone(&provider),
            AuthConfig::default().without_delays(),
            "Mozilla/5.0 (X11; Linux x86_64)",
            Arc::new(clock.clone()),
        )
        .await;
        (facade, provider, clock)
    }

    async fn wait_for_auth(facade: &AuthFacade<MockIdentityProvider>, expected: bool) {
        for _ in 0..100 {
            if facade.is_authenticated().await == expected {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("is_authenticated never became {}", expected);
    }

    #[tokio::test]
    async fn test_start_restores_session() {
        let provider = MockIdentityProvider::new()
            .with_user(EMAIL, PASSWORD, true)
            .with_session_for(EMAIL);
        let (facade, _, _) = facade_with(provider).await;

        let state = facade.state().await;
        assert!(state.is_authenticated());
        assert!(!state.loading);
        assert_eq!(state.last_error, None);
    }

    #[tokio::test]
    async fn test_start_reports_init_failure() {
        let provider = MockIdentityProvider::new();
        provider.fail_next(
            MockOp::GetSession,
            ProviderError::new(ProviderErrorCode::Network, "offline"),
        );
        let (facade, _, _) = facade_with(provider).await;

        assert!(!facade.is_authenticated().await);
        assert_eq!(
            facade.last_error().await.as_deref(),
            Some(messages::INIT_FAILED)
        );
    }

    #[tokio::test]
    async fn test_sign_in_success() {
        let (facade, _, _) = facade_with(MockIdentityProvider::new().with_user(EMAIL, PASSWORD, true)).await;

        let session = facade.sign_in(EMAIL, PASSWORD).await.unwrap();
        assert_eq!(session.user.email, EMAIL);
        assert!(facade.is_authenticated().await);
        assert!(!facade.is_loading().await);
        assert_eq!(facade.last_error().await, None);
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password_is_generic() {
        let (facade, _, _) = facade_with(MockIdentityProvider::new().with_user(EMAIL, PASSWORD, true)).await;

        let err = facade.sign_in(EMAIL, "Wrong!Pass1").await.unwrap_err();
        assert_eq!(
            err,
            AuthError::provider(ProviderErrorCode::InvalidCredentials, messages::INVALID_CREDENTIALS)
        );
        assert_eq!(
            facade.last_error().await.as_deref(),
            Some(messages::INVALID_CREDENTIALS)
        );
        assert!(!facade.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_sign_in_unconfirmed_email_is_actionable() {
        let (facade, _, _) = facade_with(MockIdentityProvider::new().with_user(EMAIL, PASSWORD, false)).await;

        let err = facade.sign_in(EMAIL, PASSWORD).await.unwrap_err();
        assert_eq!(err.to_string(), messages::EMAIL_NOT_CONFIRMED);
    }

    #[tokio::test]
    async fn test_sign_in_local_validation_skips_provider() {
        let (facade, provider, _) = facade_with(MockIdentityProvider::new()).await;

        let err = facade.sign_in("not-an-email", PASSWORD).await.unwrap_err();
        assert_eq!(err, AuthError::validation(messages::INVALID_EMAIL));

        let err = facade.sign_in(EMAIL, "12345").await.unwrap_err();
        assert_eq!(err, AuthError::validation(messages::INVALID_CREDENTIALS));

        assert_eq!(provider.call_count(MockOp::SignIn), 0);
    }

    #[tokio::test]
    async fn test_login_rate_limit_window() {
        let (facade, provider, clock) =
            facade_with(MockIdentityProvider::new().with_user(EMAIL, PASSWORD, true)).await;

        for _ in 0..5 {
            assert!(matches!(
                facade.sign_in(EMAIL, "Wrong!Pass1").await,
                Err(AuthError::Provider { .. })
            ));
        }

        let err = facade.sign_in(EMAIL, PASSWORD).await.unwrap_err();
        match err {
            AuthError::RateLimited {
                message,
                retry_after_secs,
            } => {
                assert!(message.starts_with("Too many login attempts"));
                assert!(message.contains("15 minutes"));
                assert_eq!(retry_after_secs, 900);
            }
            other => panic!("expected RateLimited, got {:?}", other),
        }
        assert_eq!(provider.call_count(MockOp::SignIn), 5);

        clock.advance(Duration::from_secs(15 * 60 + 1));
        assert!(facade.sign_in(EMAIL, PASSWORD).await.is_ok());
    }

    #[tokio::test]
    async fn test_login_limit_is_per_install_not_per_account() {
        let (facade, _, _) = facade_with(MockIdentityProvider::new()).await;

        for i in 0..5 {
            let email = format!("deck{}@sprawl.net", i);
            assert!(matches!(
                facade.sign_in(&email, PASSWORD).await,
                Err(AuthError::Provider { .. })
            ));
        }

        let err = facade.sign_in("fresh@sprawl.net", PASSWORD).await.unwrap_err();
        assert!(matches!(err, AuthError::RateLimited { .. }));
    }

    #[tokio::test]
    async fn test_sign_up_rate_limit_is_separate_from_login() {
        let (facade, _, _) = facade_with(MockIdentityProvider::new()).await;

        for i in 0..3 {
            let email = format!("runner{}@sprawl.net", i);
            facade.sign_up(&email, PASSWORD, Map::new()).await.unwrap();
        }
        let err = facade
            .sign_up("runner9@sprawl.net", PASSWORD, Map::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::RateLimited { .. }));
        assert!(err.to_string().starts_with("Too many signup attempts"));

        // The login budget is untouched.
        let err = facade.sign_in("runner0@sprawl.net", PASSWORD).await.unwrap_err();
        assert!(!matches!(err, AuthError::RateLimited { .. }));
    }

    #[tokio::test]
    async fn test_sign_up_validation_and_remapping() {
        let (facade, provider, _) =
            facade_with(MockIdentityProvider::new().with_user(EMAIL, PASSWORD, true)).await;

        let err = facade.sign_up(EMAIL, "weak", Map::new()).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
        assert_eq!(provider.call_count(MockOp::SignUp), 0);

        let err = facade.sign_up(EMAIL, PASSWORD, Map::new()).await.unwrap_err();
        assert_eq!(err.to_string(), messages::USER_ALREADY_EXISTS);
    }

    #[tokio::test]
    async fn test_sign_up_sends_profile_and_redirect() {
        let (facade, provider, _) = facade_with(MockIdentityProvider::new()).await;

        let mut profile = Map::new();
        profile.insert("full_name".into(), Value::String("Case".into()));
        let response = facade
            .sign_up("case@sprawl.net", PASSWORD, profile)
            .await
            .unwrap();
        assert!(response.session.is_none());

        let user = provider.user("case@sprawl.net").unwrap();
        assert_eq!(user.full_name(), Some("Case"));

        let emails = provider.sent_emails();
        assert_eq!(emails[0].kind, EmailKind::Confirmation);
        assert_eq!(
            emails[0].redirect_to.as_deref(),
            Some("http://localhost:5173/email-confirmed")
        );
    }

    #[tokio::test]
    async fn test_session_events_update_state() {
        let (facade, provider, _) =
            facade_with(MockIdentityProvider::new().with_user(EMAIL, PASSWORD, true)).await;
        assert!(!facade.is_authenticated().await);

        provider.sign_in_with_password(EMAIL, PASSWORD).await.unwrap();
        wait_for_auth(&facade, true).await;

        provider.emit(SessionEvent::signed_out());
        wait_for_auth(&facade, false).await;
    }

    #[tokio::test]
    async fn test_shutdown_stops_listening() {
        let (facade, provider, _) =
            facade_with(MockIdentityProvider::new().with_user(EMAIL, PASSWORD, true)).await;
        facade.shutdown();
        facade.shutdown();

        provider.sign_in_with_password(EMAIL, PASSWORD).await.unwrap();
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
        assert!(!facade.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_sign_out() {
        let provider = MockIdentityProvider::new()
            .with_user(EMAIL, PASSWORD, true)
            .with_session_for(EMAIL);
        let (facade, provider, _) = facade_with(provider).await;

        provider.fail_next(
            MockOp::SignOut,
            ProviderError::new(ProviderErrorCode::Network, "socket hang up"),
        );
        let err = facade.sign_out().await.unwrap_err();
        assert_eq!(err.to_string(), messages::SIGN_OUT_FAILED);
        assert!(facade.is_authenticated().await);

        facade.sign_out().await.unwrap();
        assert!(!facade.is_authenticated().await);
        assert_eq!(facade.last_error().await, None);
    }

    #[tokio::test]
    async fn test_generic_failure_copy() {
        let (facade, provider, _) = facade_with(MockIdentityProvider::new()).await;

        provider.fail_next(
            MockOp::ResetPassword,
            ProviderError::new(ProviderErrorCode::Other, "smtp relay denied"),
        );
        let err = facade.reset_password(EMAIL).await.unwrap_err();
        assert_eq!(err.to_string(), messages::PASSWORD_RESET_FAILED);

        // No session: the provider refuses, the copy stays generic.
        let err = facade.update_password("N3w!Password").await.unwrap_err();
        assert_eq!(err.to_string(), messages::PASSWORD_UPDATE_FAILED);
        let err = facade.update_profile(Map::new()).await.unwrap_err();
        assert_eq!(err.to_string(), messages::PROFILE_UPDATE_FAILED);

        provider.fail_next(
            MockOp::ResendSignup,
            ProviderError::new(ProviderErrorCode::Network, "offline"),
        );
        let err = facade.resend_confirmation(EMAIL).await.unwrap_err();
        assert_eq!(err.to_string(), messages::RESEND_FAILED);
    }

    #[tokio::test]
    async fn test_reset_password_redirect() {
        let (facade, provider, _) =
            facade_with(MockIdentityProvider::new().with_user(EMAIL, PASSWORD, true)).await;

        facade.reset_password(EMAIL).await.unwrap();
        let emails = provider.sent_emails();
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0].kind, EmailKind::PasswordReset);
        assert_eq!(
            emails[0].redirect_to.as_deref(),
            Some("http://localhost:5173/reset-password")
        );
    }

    #[tokio::test]
    async fn test_update_profile_refreshes_cached_user() {
        let provider = MockIdentityProvider::new()
            .with_user(EMAIL, PASSWORD, true)
            .with_session_for(EMAIL);
        let (facade, _, _) = facade_with(provider).await;

        let mut updates = Map::new();
        updates.insert("full_name".into(), Value::String("Molly Millions".into()));
        facade.update_profile(updates).await.unwrap();

        let user = facade.current_user().await.unwrap();
        assert_eq!(user.full_name(), Some("Molly Millions"));
    }

    #[tokio::test]
    async fn test_update_password() {
        let provider = MockIdentityProvider::new()
            .with_user(EMAIL, PASSWORD, true)
            .with_session_for(EMAIL);
        let (facade, provider, _) = facade_with(provider).await;

        facade.update_password("N3w!Password").await.unwrap();
        assert_eq!(provider.password_of(EMAIL).as_deref(), Some("N3w!Password"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_sign_in_is_padded_twice() {
        let provider = Arc::new(MockIdentityProvider::new().with_user(EMAIL, PASSWORD, true));
        let facade = AuthFacade::start(Arc::clone(&provider), AuthConfig::default(), "ua").await;

        let start = tokio::time::Instant::now();
        let _ = facade.sign_in(EMAIL, "Wrong!Pass1").await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(200), "{:?}", elapsed);
        assert!(elapsed <= Duration::from_millis(602), "{:?}", elapsed);
    }

    #[test]
    fn test_state_serializes_camel_case() {
        let state = AuthState::default();
        let json = serde_json::to_value(&state).unwrap();
        assert!(json.get("currentUser").is_some());
        assert!(json.get("lastError").is_some());
    }
}
