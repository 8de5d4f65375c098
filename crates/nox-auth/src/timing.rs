//! Timing mitigation and random tokens.
//!
//! Credential calls are padded with a random delay so response time does
//! not reveal whether an account exists.

use std::fmt::Write;
use std::time::Duration;

use rand::rngs::OsRng;
use rand::{Rng, RngCore};

/// Default length, in bytes, of [`generate_secure_token`] output.
pub const DEFAULT_TOKEN_BYTES: usize = 32;

/// Sleeps for a uniformly random duration in `[min, max]`.
pub async fn secure_delay(min: Duration, max: Duration) {
    let delay = random_delay(min, max);
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// Picks the delay used by [`secure_delay`].
pub fn random_delay(min: Duration, max: Duration) -> Duration {
    if max <= min {
        return min;
    }
    let min_ms = min.as_millis() as u64;
    let max_ms = max.as_millis() as u64;
    Duration::from_millis(rand::thread_rng().gen_range(min_ms..=max_ms))
}

/// Returns `len` random bytes from the OS generator, hex encoded
/// (two characters per byte).
pub fn generate_secure_token(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);

    let mut token = String::with_capacity(len * 2);
    for byte in bytes {
        let _ = write!(token, "{:02x}", byte);
    }
    token
}
