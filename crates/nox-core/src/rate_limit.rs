//! # Rate Limiter
//!
//! Fixed-window attempt counter used to throttle the auth forms.
//!
//! ## Window Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  is_allowed("login_<client>", max = 3, window = 60s)                    │
//! │                                                                         │
//! │  t=0s   ✅ count 1   reset_at = 60s                                     │
//! │  t=1s   ✅ count 2                                                      │
//! │  t=2s   ✅ count 3                                                      │
//! │  t=3s   ❌ count stays 3 (rejections are not counted)                   │
//! │  t=60s  ❌ still inside the window (reset needs now > reset_at)         │
//! │  t=61s  ✅ window expired → count 1, reset_at = 121s                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Not a Security Boundary
//! Keys are client-supplied strings (a user agent, a client id). Anyone can
//! change them. This limiter only smooths honest retry storms; the identity
//! provider enforces the real limits.
//!
//! Time comes from an injected [`Clock`] so tests never sleep. Window ends
//! saturate at the latest representable instant instead of overflowing,
//! and expired windows are dropped on every check so the map only holds
//! keys that are still throttled.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};

// =============================================================================
// Clock
// =============================================================================

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same instant, so a test can keep one handle and give
/// another to the limiter.
#[derive(Debug, Clone)]
pub struct ManualClock {
    time: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    /// Creates a clock frozen at `time`.
    pub fn new(time: DateTime<Utc>) -> Self {
        ManualClock {
            time: Arc::new(Mutex::new(time)),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut time = self.time.lock().unwrap_or_else(|e| e.into_inner());
        *time = saturating_add(*time, by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.time.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn to_chrono(duration: Duration) -> chrono::Duration {
    let millis = duration.as_millis().min(i64::MAX as u128) as i64;
    chrono::Duration::try_milliseconds(millis).unwrap_or(chrono::Duration::MAX)
}

/// `time + duration`, clamped to [`DateTime::<Utc>::MAX_UTC`].
fn saturating_add(time: DateTime<Utc>, duration: Duration) -> DateTime<Utc> {
    time.checked_add_signed(to_chrono(duration))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

// =============================================================================
// Rate Limiter
// =============================================================================

/// Attempts recorded for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AttemptWindow {
    count: u32,
    reset_at: DateTime<Utc>,
}

/// In-memory, process-lifetime attempt counter.
pub struct RateLimiter {
    clock: Arc<dyn Clock>,
    attempts: HashMap<String, AttemptWindow>,
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("keys", &self.attempts.len())
            .finish()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        RateLimiter::new(Arc::new(SystemClock))
    }
}

impl RateLimiter {
    /// Creates a limiter reading time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        RateLimiter {
            clock,
            attempts: HashMap::new(),
        }
    }

    /// Records an attempt for `key` if the window still has room.
    ///
    /// Returns `false` (without counting) once `max_attempts` is reached.
    pub fn is_allowed(&mut self, key: &str, max_attempts: u32, window: Duration) -> bool {
        let now = self.clock.now();
        self.attempts.retain(|_, w| now <= w.reset_at);

        let entry = self
            .attempts
            .entry(key.to_string())
            .or_insert(AttemptWindow {
                count: 0,
                reset_at: saturating_add(now, window),
            });

        if entry.count >= max_attempts {
            return false;
        }

        entry.count += 1;
        true
    }

    /// Attempts left in the current window.
    pub fn remaining_attempts(&self, key: &str, max_attempts: u32) -> u32 {
        match self.attempts.get(key) {
            None => max_attempts,
            Some(window) if self.clock.now() > window.reset_at => max_attempts,
            Some(window) => max_attempts.saturating_sub(window.count),
        }
    }

    /// Whole seconds until the key's window resets, rounded up, never negative.
    pub fn time_until_reset(&self, key: &str) -> u64 {
        let Some(window) = self.attempts.get(key) else {
            return 0;
        };

        let millis = (window.reset_at - self.clock.now()).num_milliseconds();
        if millis <= 0 {
            0
        } else {
            (millis as u64).div_ceil(1000)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
