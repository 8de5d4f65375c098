//! # Password Strength
//!
//! Scores a password for the live strength meter on the sign-up and
//! change-password forms. This is feedback only; acceptance is decided by
//! [`crate::validation::validate_password`].
//!
//! ## Scoring
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  +1  length ≥ 8         +1  symbol           │
//! │  +1  uppercase          +1  no "aaa" runs    │
//! │  +1  lowercase          +1  no common word   │
//! │  +1  digit              +1  length ≥ 12      │
//! ├──────────────────────────────────────────────┤
//! │  0-2 VeryWeak  3-4 Weak  5-6 Good  7-8 Strong│
//! └──────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::validation::{has_repeated_run, CharClasses};

/// Highest possible score.
pub const MAX_STRENGTH_SCORE: u8 = 8;

/// Coarse strength bucket shown next to the meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StrengthLevel {
    /// Nothing typed yet.
    Empty,
    VeryWeak,
    Weak,
    Good,
    Strong,
}

impl StrengthLevel {
    /// Label for the meter.
    pub fn label(&self) -> &'static str {
        match self {
            StrengthLevel::Empty => "",
            StrengthLevel::VeryWeak => "Very Weak",
            StrengthLevel::Weak => "Weak",
            StrengthLevel::Good => "Good",
            StrengthLevel::Strong => "Strong",
        }
    }

    /// One-line feedback under the meter.
    pub fn feedback(&self) -> &'static str {
        match self {
            StrengthLevel::Empty => "",
            StrengthLevel::VeryWeak => "Password is too weak",
            StrengthLevel::Weak => "Password could be stronger",
            StrengthLevel::Good => "Password is reasonably strong",
            StrengthLevel::Strong => "Password is strong and secure",
        }
    }
}

/// Meter reading for a password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PasswordStrength {
    /// 0 for empty input, otherwise 1..=8.
    pub score: u8,
    pub level: StrengthLevel,
}

impl PasswordStrength {
    /// Meter fill as a percentage of the maximum score.
    pub fn percent(&self) -> u8 {
        ((self.score as u16 * 100) / MAX_STRENGTH_SCORE as u16) as u8
    }
}

/// Scores a password.
///
/// ## Example
/// ```rust
/// use nox_core::password::{password_strength, StrengthLevel};
///
/// assert_eq!(password_strength("").level, StrengthLevel::Empty);
/// assert_eq!(password_strength("aaa").level, StrengthLevel::VeryWeak);
/// assert_eq!(password_strength("Neon!Tubes2077x").level, StrengthLevel::Strong);
/// ```
pub fn password_strength(password: &str) -> PasswordStrength {
    if password.is_empty() {
        return PasswordStrength {
            score: 0,
            level: StrengthLevel::Empty,
        };
    }

    let length = password.chars().count();
    let classes = CharClasses::of(password);
    let lower = password.to_lowercase();
    let common = ["123456", "abcdef", "password", "qwerty"]
        .iter()
        .any(|pattern| lower.contains(pattern));

    let score = [
        length >= 8,
        classes.upper,
        classes.lower,
        classes.digit,
        classes.symbol,
        !has_repeated_run(password),
        !common,
        length >= 12,
    ]
    .iter()
    .filter(|passed| **passed)
    .count() as u8;

    let (score, level) = match score {
        0..=2 => (score.max(1), StrengthLevel::VeryWeak),
        3..=4 => (score, StrengthLevel::Weak),
        5..=6 => (score, StrengthLevel::Good),
        _ => (score, StrengthLevel::Strong),
    };

    PasswordStrength { score, level }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_scores_zero() {
        let strength = password_strength("");
        assert_eq!(strength.score, 0);
        assert_eq!(strength.percent(), 0);
    }

    #[test]
    fn test_very_weak() {
        // "aaa": lowercase only, and a repeat run -> lower + no-common = 2
        let strength = password_strength("aaa");
        assert_eq!(strength.level, StrengthLevel::VeryWeak);
        assert_eq!(strength.score, 2);

        // "AAA": upper + no-common = 2
        assert_eq!(password_strength("AAA").score, 2);
    }

    #[test]
    fn test_levels() {
        // lower, no repeat, no common = 3
        assert_eq!(password_strength("neon").level, StrengthLevel::Weak);
        // length8, lower, digit, no repeat, no common = 5
        assert_eq!(password_strength("neontube7").level, StrengthLevel::Good);
        // all but length >= 12 = 7
        assert_eq!(password_strength("Neon!Tube7").score, 7);
        assert_eq!(password_strength("Neon!Tubes2077x").score, 8);
        assert_eq!(password_strength("Neon!Tubes2077x").percent(), 100);
    }

    #[test]
    fn test_common_patterns_ignore_case() {
        let plain = password_strength("Xy7!ABCDEFgh");
        let mixed = password_strength("Xy7!AbCdEzgh");
        assert_eq!(plain.score + 1, mixed.score);
    }

    #[test]
    fn test_labels() {
        assert_eq!(StrengthLevel::VeryWeak.label(), "Very Weak");
        assert_eq!(StrengthLevel::Strong.feedback(), "Password is strong and secure");
    }
}
