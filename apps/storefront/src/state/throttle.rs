//! # Form Throttle
//!
//! Per-browser attempt limits for the sign-up and sign-in forms. Every
//! submit that gets past the automated-agent check counts, valid or not.
//!
//! ```text
//! submit ──► looks_automated? ──► FormThrottle ──► field validation ──► AuthFacade
//!                 │ 403                 │ 429
//!                 ▼                     ▼
//!           "Access denied"   "Too many ... Please wait N minutes."
//!
//!   signup_form_<user agent>   2 per 10 minutes
//!   login_form_<user agent>    3 per 5 minutes
//! ```
//!
//! Keys come from the request's user agent, so these limits are advisory.
//! The facade keeps its own, longer per-install windows behind these.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, warn};

use nox_core::rate_limit::{Clock, RateLimiter, SystemClock};

use crate::error::{ApiError, ErrorCode};

pub const SIGNUP_FORM_MAX_ATTEMPTS: u32 = 2;
pub const SIGNUP_FORM_WINDOW: Duration = Duration::from_secs(10 * 60);
pub const LOGIN_FORM_MAX_ATTEMPTS: u32 = 3;
pub const LOGIN_FORM_WINDOW: Duration = Duration::from_secs(5 * 60);

/// Shared attempt counter for the auth forms.
#[derive(Debug, Clone)]
pub struct FormThrottle {
    limiter: Arc<Mutex<RateLimiter>>,
}

impl Default for FormThrottle {
    fn default() -> Self {
        FormThrottle::with_clock(Arc::new(SystemClock))
    }
}

impl FormThrottle {
    pub fn new() -> Self {
        FormThrottle::default()
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        FormThrottle {
            limiter: Arc::new(Mutex::new(RateLimiter::new(clock))),
        }
    }

    /// Counts a sign-up submit from `user_agent`.
    pub fn check_signup(&self, user_agent: &str) -> Result<(), ApiError> {
        self.check(
            &format!("signup_form_{}", user_agent),
            SIGNUP_FORM_MAX_ATTEMPTS,
            SIGNUP_FORM_WINDOW,
            "Too many signup attempts.",
        )
    }

    /// Counts a sign-in submit from `user_agent`.
    pub fn check_login(&self, user_agent: &str) -> Result<(), ApiError> {
        self.check(
            &format!("login_form_{}", user_agent),
            LOGIN_FORM_MAX_ATTEMPTS,
            LOGIN_FORM_WINDOW,
            "Too many attempts.",
        )
    }

    fn check(
        &self,
        key: &str,
        max_attempts: u32,
        window: Duration,
        headline: &str,
    ) -> Result<(), ApiError> {
        let mut limiter = self.limiter.lock().unwrap_or_else(|e| e.into_inner());
        if limiter.is_allowed(key, max_attempts, window) {
            debug!(
                remaining = limiter.remaining_attempts(key, max_attempts),
                "Form submit allowed"
            );
            return Ok(());
        }

        let retry_after_secs = limiter.time_until_reset(key);
        warn!(retry_after_secs, "Form submit throttled");
        Err(ApiError::new(
            ErrorCode::RateLimited,
            format!("{} Please wait {} minutes.", headline, wait_minutes(retry_after_secs)),
        ))
    }
}

fn wait_minutes(retry_after_secs: u64) -> u64 {
    retry_after_secs.div_ceil(60).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use nox_core::rate_limit::ManualClock;

    const BROWSER: &str = "Mozilla/5.0 (X11; Linux x86_64) Firefox/130.0";

    fn throttle() -> (FormThrottle, ManualClock) {
        let clock = ManualClock::new(Utc::now());
        (FormThrottle::with_clock(Arc::new(clock.clone())), clock)
    }

    #[test]
    fn test_third_signup_submit_is_throttled() {
        let (throttle, clock) = throttle();
        assert!(throttle.check_signup(BROWSER).is_ok());
        assert!(throttle.check_signup(BROWSER).is_ok());

        let err = throttle.check_signup(BROWSER).unwrap_err();
        assert_eq!(err.code, ErrorCode::RateLimited);
        assert_eq!(err.message, "Too many signup attempts. Please wait 10 minutes.");

        clock.advance(Duration::from_secs(4 * 60 + 30));
        let err = throttle.check_signup(BROWSER).unwrap_err();
        assert_eq!(err.message, "Too many signup attempts. Please wait 6 minutes.");

        clock.advance(Duration::from_secs(6 * 60));
        assert!(throttle.check_signup(BROWSER).is_ok());
    }

    #[test]
    fn test_fourth_login_submit_is_throttled() {
        let (throttle, _clock) = throttle();
        for _ in 0..3 {
            assert!(throttle.check_login(BROWSER).is_ok());
        }

        let err = throttle.check_login(BROWSER).unwrap_err();
        assert_eq!(err.code, ErrorCode::RateLimited);
        assert_eq!(err.message, "Too many attempts. Please wait 5 minutes.");
    }

    #[test]
    fn test_forms_and_agents_are_independent() {
        let (throttle, _clock) = throttle();
        for _ in 0..3 {
            throttle.check_login(BROWSER).unwrap();
        }
        assert!(throttle.check_login(BROWSER).is_err());

        assert!(throttle.check_signup(BROWSER).is_ok());
        assert!(throttle.check_login("Mozilla/5.0 (Macintosh) Safari/17.0").is_ok());

        // Clones share the counter.
        assert!(throttle.clone().check_login(BROWSER).is_err());
    }

    #[test]
    fn test_wait_minutes_rounds_up() {
        assert_eq!(wait_minutes(600), 10);
        assert_eq!(wait_minutes(61), 2);
        assert_eq!(wait_minutes(0), 1);
    }
}
