//! # In-Memory Identity Provider
//!
//! A [`IdentityProvider`] that keeps accounts in memory, for tests and for
//! running the storefront without a hosted identity service.
//!
//! ```text
//! MockIdentityProvider
//!   ├── accounts   email → (password, User)
//!   ├── session    current Session (one per process)
//!   ├── outbox     emails that would have been sent (reset, confirmation)
//!   ├── failures   op → ProviderError, consumed by the next call
//!   └── events     broadcast::Sender<SessionEvent>
//! ```
//!
//! Unknown emails and wrong passwords both fail with `InvalidCredentials`,
//! as hosted providers do.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::provider::{
    IdentityProvider, ProviderError, ProviderErrorCode, ProviderResult, Session, SessionEvent,
    SessionEventKind, SignUpOptions, SignUpResponse, User, UserUpdate,
};
use crate::timing::generate_secure_token;

const EVENT_CAPACITY: usize = 64;

/// Provider operations, for failure injection and call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOp {
    GetSession,
    SignUp,
    SignIn,
    SignOut,
    ResetPassword,
    UpdateUser,
    ResendSignup,
}

/// Kind of email the provider would have sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailKind {
    Confirmation,
    PasswordReset,
}

/// An email recorded instead of being sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub kind: EmailKind,
    pub to: String,
    pub redirect_to: Option<String>,
}

#[derive(Debug, Default)]
struct MockState {
    accounts: HashMap<String, (String, User)>,
    session: Option<Session>,
    outbox: Vec<SentEmail>,
    failures: HashMap<MockOp, ProviderError>,
    calls: HashMap<MockOp, usize>,
    auto_confirm: bool,
    signups_disabled: bool,
}

/// In-memory identity provider.
#[derive(Debug)]
pub struct MockIdentityProvider {
    state: Mutex<MockState>,
    events: broadcast::Sender<SessionEvent>,
}

impl Default for MockIdentityProvider {
    fn default() -> Self {
        MockIdentityProvider::new()
    }
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        MockIdentityProvider {
            state: Mutex::new(MockState::default()),
            events,
        }
    }

    /// Adds an existing account.
    pub fn with_user(self, email: &str, password: &str, confirmed: bool) -> Self {
        self.with_state(|state| {
            let user = new_user(email, serde_json::Map::new(), confirmed);
            state
                .accounts
                .insert(email.to_lowercase(), (password.to_string(), user));
        });
        self
    }

    /// Starts with `email` already signed in. The account must exist.
    pub fn with_session_for(self, email: &str) -> Self {
        self.with_state(|state| {
            if let Some((_, user)) = state.accounts.get(&email.to_lowercase()) {
                state.session = Some(new_session(user.clone()));
            }
        });
        self
    }

    /// New accounts are confirmed (and signed in) immediately.
    pub fn with_auto_confirm(self) -> Self {
        self.with_state(|state| state.auto_confirm = true);
        self
    }

    pub fn with_signups_disabled(self) -> Self {
        self.with_state(|state| state.signups_disabled = true);
        self
    }

    /// Makes the next call to `op` fail with `error`.
    pub fn fail_next(&self, op: MockOp, error: ProviderError) {
        self.with_state(|state| {
            state.failures.insert(op, error);
        });
    }

    /// Pushes an arbitrary session event to subscribers.
    pub fn emit(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }

    pub fn call_count(&self, op: MockOp) -> usize {
        self.with_state(|state| state.calls.get(&op).copied().unwrap_or(0))
    }

    pub fn sent_emails(&self) -> Vec<SentEmail> {
        self.with_state(|state| state.outbox.clone())
    }

    pub fn user(&self, email: &str) -> Option<User> {
        self.with_state(|state| {
            state
                .accounts
                .get(&email.to_lowercase())
                .map(|(_, user)| user.clone())
        })
    }

    pub fn password_of(&self, email: &str) -> Option<String> {
        self.with_state(|state| {
            state
                .accounts
                .get(&email.to_lowercase())
                .map(|(password, _)| password.clone())
        })
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut MockState) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut state)
    }

    /// Counts the call and returns an injected failure, if any.
    fn begin(&self, op: MockOp) -> ProviderResult<()> {
        self.with_state(|state| {
            *state.calls.entry(op).or_insert(0) += 1;
            match state.failures.remove(&op) {
                Some(err) => Err(err),
                None => Ok(()),
            }
        })
    }
}

fn new_user(email: &str, metadata: serde_json::Map<String, serde_json::Value>, confirmed: bool) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4().to_string(),
        email: email.to_string(),
        created_at: now,
        email_confirmed_at: confirmed.then_some(now),
        user_metadata: metadata,
    }
}

fn new_session(user: User) -> Session {
    Session {
        access_token: generate_secure_token(16),
        expires_at: Some(Utc::now() + chrono::Duration::hours(1)),
        user,
    }
}

fn invalid_credentials() -> ProviderError {
    ProviderError::new(ProviderErrorCode::InvalidCredentials, "Invalid login credentials")
}

impl IdentityProvider for MockIdentityProvider {
    async fn get_session(&self) -> ProviderResult<Option<Session>> {
        self.begin(MockOp::GetSession)?;
        Ok(self.with_state(|state| state.session.clone()))
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        options: SignUpOptions,
    ) -> ProviderResult<SignUpResponse> {
        self.begin(MockOp::SignUp)?;

        let (response, event) = self.with_state(|state| {
            if state.signups_disabled {
                return Err(ProviderError::new(
                    ProviderErrorCode::SignupDisabled,
                    "Signups not allowed for this instance",
                ));
            }
            let key = email.to_lowercase();
            if state.accounts.contains_key(&key) {
                return Err(ProviderError::new(
                    ProviderErrorCode::UserAlreadyExists,
                    "User already registered",
                ));
            }

            let user = new_user(email, options.data, state.auto_confirm);
            state
                .accounts
                .insert(key, (password.to_string(), user.clone()));

            if state.auto_confirm {
                let session = new_session(user.clone());
                state.session = Some(session.clone());
                let response = SignUpResponse {
                    user: Some(user),
                    session: Some(session.clone()),
                };
                Ok((response, Some(SessionEvent::signed_in(session))))
            } else {
                state.outbox.push(SentEmail {
                    kind: EmailKind::Confirmation,
                    to: email.to_string(),
                    redirect_to: options.redirect_to,
                });
                let response = SignUpResponse {
                    user: Some(user),
                    session: None,
                };
                Ok((response, None))
            }
        })?;

        if let Some(event) = event {
            self.emit(event);
        }
        Ok(response)
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> ProviderResult<Session> {
        self.begin(MockOp::SignIn)?;

        let session = self.with_state(|state| {
            let (stored, user) = state
                .accounts
                .get(&email.to_lowercase())
                .ok_or_else(invalid_credentials)?;
            if stored != password {
                return Err(invalid_credentials());
            }
            if !user.is_email_confirmed() {
                return Err(ProviderError::new(
                    ProviderErrorCode::EmailNotConfirmed,
                    "Email not confirmed",
                ));
            }
            let session = new_session(user.clone());
            state.session = Some(session.clone());
            Ok(session)
        })?;

        self.emit(SessionEvent::signed_in(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> ProviderResult<()> {
        self.begin(MockOp::SignOut)?;
        self.with_state(|state| state.session = None);
        self.emit(SessionEvent::signed_out());
        Ok(())
    }

    async fn reset_password_for_email(&self, email: &str, redirect_to: &str) -> ProviderResult<()> {
        self.begin(MockOp::ResetPassword)?;
        self.with_state(|state| {
            // Unknown emails succeed silently so the form cannot probe for accounts.
            if state.accounts.contains_key(&email.to_lowercase()) {
                state.outbox.push(SentEmail {
                    kind: EmailKind::PasswordReset,
                    to: email.to_string(),
                    redirect_to: Some(redirect_to.to_string()),
                });
            }
        });
        Ok(())
    }

    async fn update_user(&self, update: UserUpdate) -> ProviderResult<User> {
        self.begin(MockOp::UpdateUser)?;

        let session = self.with_state(|state| {
            let mut session = state.session.clone().ok_or_else(|| {
                ProviderError::new(ProviderErrorCode::Other, "Auth session missing")
            })?;
            let key = session.user.email.to_lowercase();
            let (password, user) = state
                .accounts
                .get_mut(&key)
                .ok_or_else(|| ProviderError::new(ProviderErrorCode::UserNotFound, "User not found"))?;

            if let Some(new_password) = update.password {
                *password = new_password;
            }
            if let Some(data) = update.data {
                user.user_metadata.extend(data);
            }

            session.user = user.clone();
            state.session = Some(session.clone());
            Ok(session)
        })?;

        let user = session.user.clone();
        self.emit(SessionEvent {
            kind: SessionEventKind::UserUpdated,
            session: Some(session),
        });
        Ok(user)
    }

    async fn resend_signup(&self, email: &str, redirect_to: &str) -> ProviderResult<()> {
        self.begin(MockOp::ResendSignup)?;
        self.with_state(|state| {
            let pending = state
                .accounts
                .get(&email.to_lowercase())
                .is_some_and(|(_, user)| !user.is_email_confirmed());
            if pending {
                state.outbox.push(SentEmail {
                    kind: EmailKind::Confirmation,
                    to: email.to_string(),
                    redirect_to: Some(redirect_to.to_string()),
                });
            }
        });
        Ok(())
    }
}
