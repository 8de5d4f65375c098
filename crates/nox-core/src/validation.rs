//! # Validation Module
//!
//! Input validators and sanitization for the storefront forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form validators (THIS MODULE)                                │
//! │  ├── Shape checks: email, password, name, phone, address              │
//! │  └── Return { is_valid, message } for inline field feedback           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Storefront commands                                          │
//! │  ├── FieldCheck::into_result() turns a failed check into an error     │
//! │  └── sanitize_input() on every user-entered field before storage      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Identity provider (external)                                 │
//! │  └── The authoritative checks. Everything here is advisory.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use nox_core::validation::{validate_email, validate_password, sanitize_input};
//!
//! assert!(validate_email("neo@nox.city"));
//! assert!(validate_password("Neon!Tube7").is_valid);
//! assert_eq!(sanitize_input(" <b> "), "&lt;b&gt;");
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Symbols that satisfy the password "special character" class.
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>?";

/// RFC 5321 ceiling on a full address.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Sanitized strings are cut to this many characters.
pub const MAX_SANITIZED_LENGTH: usize = 1000;

/// Substrings that mark a user agent as automated.
const AUTOMATED_AGENT_PATTERNS: [&str; 8] = [
    "bot", "crawl", "spider", "scraper", "curl", "wget", "python", "automated",
];

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("Invalid email regex")
});

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s\-']+$").expect("Invalid name regex"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?\d{10,15}$").expect("Invalid phone regex"));

// =============================================================================
// Field Check
// =============================================================================

/// Outcome of a form-field validator.
///
/// Failed checks carry the user-facing message; some passing checks carry
/// the normalized value (trimmed name, cleaned phone number).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FieldCheck {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Result of [`validate_password`].
pub type PasswordCheck = FieldCheck;

/// Result of [`validate_name`].
pub type NameCheck = FieldCheck;

impl FieldCheck {
    /// Passing check with nothing to report.
    pub fn ok() -> Self {
        FieldCheck {
            is_valid: true,
            message: None,
            value: None,
        }
    }

    /// Passing check with a normalized value.
    pub fn ok_with(value: impl Into<String>) -> Self {
        FieldCheck {
            is_valid: true,
            message: None,
            value: Some(value.into()),
        }
    }

    /// Failing check with a user-facing message.
    pub fn fail(message: impl Into<String>) -> Self {
        FieldCheck {
            is_valid: false,
            message: Some(message.into()),
            value: None,
        }
    }

    /// Converts the check into a `Result` so commands can use `?`.
    ///
    /// Returns the normalized value when one was produced.
    pub fn into_result(self, field: &str) -> ValidationResult<Option<String>> {
        if self.is_valid {
            Ok(self.value)
        } else {
            Err(ValidationError::invalid(
                field,
                self.message.unwrap_or_else(|| format!("Invalid {field}")),
            ))
        }
    }
}

// =============================================================================
// String Validators
// =============================================================================

/// Checks an email address.
///
/// ## Rules
/// - At most 254 characters
/// - `local@domain` where the domain is dot-separated labels of 1-63
///   alphanumerics/hyphens that neither start nor end with a hyphen
///
/// ## Example
/// ```rust
/// use nox_core::validation::validate_email;
///
/// assert!(validate_email("trinity@zion.io"));
/// assert!(!validate_email("trinity@-zion.io"));
/// assert!(!validate_email("no-at-sign"));
/// ```
pub fn validate_email(email: &str) -> bool {
    email.chars().count() <= MAX_EMAIL_LENGTH && EMAIL_RE.is_match(email)
}

/// Checks a password for sign-up and password changes.
///
/// ## Rules
/// ```text
/// length 8..=128 ──► upper + lower + digit + symbol ──► no weak pattern
///                                                        ├── aaa / 111 (3+ repeats)
///                                                        ├── 123456, abcdef
///                                                        └── password, qwerty (any case)
/// ```
pub fn validate_password(password: &str) -> PasswordCheck {
    let length = password.chars().count();

    if length < 8 {
        return FieldCheck::fail("Password must be at least 8 characters long");
    }

    if length > 128 {
        return FieldCheck::fail("Password too long (max 128 characters)");
    }

    let classes = CharClasses::of(password);
    if !classes.all() {
        return FieldCheck::fail(
            "Password must contain at least one uppercase letter, lowercase letter, number, and special character",
        );
    }

    if has_repeated_run(password) || has_weak_pattern(password) {
        return FieldCheck::fail(
            "Password contains common patterns. Please choose a stronger password.",
        );
    }

    FieldCheck::ok()
}

/// Checks a person's name. The trimmed name is returned as the value.
///
/// ## Example
/// ```rust
/// use nox_core::validation::validate_name;
///
/// let check = validate_name("  Molly O'Neil-Hart ");
/// assert!(check.is_valid);
/// assert_eq!(check.value.as_deref(), Some("Molly O'Neil-Hart"));
/// ```
pub fn validate_name(name: &str) -> NameCheck {
    if name.is_empty() {
        return FieldCheck::fail("Name is required");
    }

    let trimmed = name.trim();
    let length = trimmed.chars().count();

    if length < 2 {
        return FieldCheck::fail("Name must be at least 2 characters long");
    }

    if length > 100 {
        return FieldCheck::fail("Name too long (max 100 characters)");
    }

    if !NAME_RE.is_match(trimmed) {
        return FieldCheck::fail(
            "Name can only contain letters, spaces, hyphens, and apostrophes",
        );
    }

    FieldCheck::ok_with(trimmed)
}

/// Checks an optional phone number. The cleaned digits are the value.
///
/// Everything except digits and `+` is stripped before checking.
pub fn validate_phone_number(phone: &str) -> FieldCheck {
    if phone.is_empty() {
        return FieldCheck::ok();
    }

    let cleaned: String = phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();

    if !(10..=15).contains(&cleaned.len()) || !PHONE_RE.is_match(&cleaned) {
        return FieldCheck::fail("Invalid phone number format");
    }

    FieldCheck::ok_with(cleaned)
}

/// Checks an optional street address (only a length ceiling).
pub fn validate_address(address: &str) -> FieldCheck {
    if address.is_empty() {
        return FieldCheck::ok();
    }

    let trimmed = address.trim();
    if trimmed.chars().count() > 500 {
        return FieldCheck::fail("Address too long (max 500 characters)");
    }

    FieldCheck::ok_with(trimmed)
}

// =============================================================================
// Sanitization
// =============================================================================

/// Escapes HTML-significant characters and caps the length.
///
/// ## Steps
/// ```text
/// "  <a>&'\"  " ──trim──► "<a>&'\"" ──escape──► "&lt;a&gt;&amp;&#x27;&quot;" ──cap 1000──►
/// ```
///
/// The cap applies to the escaped output, so an escaped entity can be cut
/// in half at the boundary.
pub fn sanitize_input(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());

    for c in input.trim().chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '&' => escaped.push_str("&amp;"),
            other => escaped.push(other),
        }
    }

    match escaped.char_indices().nth(MAX_SANITIZED_LENGTH) {
        Some((cut, _)) => escaped[..cut].to_string(),
        None => escaped,
    }
}

/// Returns true when a user agent looks like a script or crawler.
///
/// Purely advisory; any client can send any user agent.
pub fn looks_automated(user_agent: &str) -> bool {
    let agent = user_agent.to_lowercase();
    AUTOMATED_AGENT_PATTERNS
        .iter()
        .any(|pattern| agent.contains(pattern))
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product page: Add to Cart                                              │
/// │                                                                         │
/// │  User picks quantity: 5                                                │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(5) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"               │
/// │       │                                                                 │
/// │       ├── qty > 999? → Error: "quantity must be between 1 and 999"     │
/// │       │                                                                 │
/// │       └── OK → Dispatch CartAction::Add                                │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates that a cart with `current_lines` lines can take one more.
pub fn validate_cart_size(current_lines: usize) -> ValidationResult<()> {
    if current_lines >= MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 0,
            max: MAX_CART_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Password Internals (shared with the strength meter)
// =============================================================================

/// Which character classes a password contains.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CharClasses {
    pub upper: bool,
    pub lower: bool,
    pub digit: bool,
    pub symbol: bool,
}

impl CharClasses {
    pub(crate) fn of(password: &str) -> Self {
        let mut classes = CharClasses::default();
        for c in password.chars() {
            classes.upper |= c.is_ascii_uppercase();
            classes.lower |= c.is_ascii_lowercase();
            classes.digit |= c.is_ascii_digit();
            classes.symbol |= PASSWORD_SYMBOLS.contains(c);
        }
        classes
    }

    pub(crate) fn all(&self) -> bool {
        self.upper && self.lower && self.digit && self.symbol
    }
}

/// Any character repeated three or more times in a row ("aaa", "111").
pub(crate) fn has_repeated_run(password: &str) -> bool {
    let chars: Vec<char> = password.chars().collect();
    chars.windows(3).any(|w| w[0] == w[1] && w[1] == w[2])
}

/// Sequential runs are matched as written; the words match in any case.
fn has_weak_pattern(password: &str) -> bool {
    let lower = password.to_lowercase();
    password.contains("123456")
        || password.contains("abcdef")
        || lower.contains("password")
        || lower.contains("qwerty")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("neo@matrix.io"));
        assert!(validate_email("first.last+tag@sub.nox-city.com"));
        assert!(validate_email("a@b"));

        assert!(!validate_email(""));
        assert!(!validate_email("no-at-sign"));
        assert!(!validate_email("two@@signs.com"));
        assert!(!validate_email("bad@-hyphen.com"));
        assert!(!validate_email("bad@hyphen-.com"));
        assert!(!validate_email("spaces in@local.com"));

        let long = format!("{}@nox.io", "a".repeat(250));
        assert!(!validate_email(&long));
    }

    #[test]
    fn test_validate_password_messages() {
        assert_eq!(
            validate_password("Ab1!").message.as_deref(),
            Some("Password must be at least 8 characters long")
        );
        assert_eq!(
            validate_password(&format!("Ab1!{}", "x".repeat(130))).message.as_deref(),
            Some("Password too long (max 128 characters)")
        );
        assert!(validate_password("neontubes1!")
            .message
            .unwrap()
            .starts_with("Password must contain"));
        assert_eq!(
            validate_password("Neon!aaa7").message.as_deref(),
            Some("Password contains common patterns. Please choose a stronger password.")
        );
    }

    #[test]
    fn test_validate_password_weak_patterns() {
        assert!(!validate_password("Xy!123456z").is_valid);
        assert!(!validate_password("Xy!9abcdefZ").is_valid);
        assert!(!validate_password("MyPassWord1!").is_valid);
        assert!(!validate_password("QWERTY!1a").is_valid);
        assert!(validate_password("Neon!Tube7").is_valid);
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("").message.as_deref(), Some("Name is required"));
        assert_eq!(
            validate_name(" a ").message.as_deref(),
            Some("Name must be at least 2 characters long")
        );
        assert_eq!(
            validate_name(&"a".repeat(101)).message.as_deref(),
            Some("Name too long (max 100 characters)")
        );
        assert!(!validate_name("R2-D2").is_valid);
        assert!(!validate_name("<script>").is_valid);
        assert_eq!(validate_name(" Case ").value.as_deref(), Some("Case"));
    }

    #[test]
    fn test_validate_phone_number() {
        assert!(validate_phone_number("").is_valid);
        assert_eq!(
            validate_phone_number("(555) 123-4567").value.as_deref(),
            Some("5551234567")
        );
        assert_eq!(
            validate_phone_number("+44 20 7946 0958").value.as_deref(),
            Some("+442079460958")
        );
        assert!(!validate_phone_number("555-1234").is_valid);
        assert!(!validate_phone_number("1234567890123456").is_valid);
        // A plus anywhere but the front fails the pattern
        assert!(!validate_phone_number("555+1234567").is_valid);
    }

    #[test]
    fn test_validate_address() {
        assert!(validate_address("").is_valid);
        assert!(validate_address("42 Neon Ave").is_valid);
        assert!(!validate_address(&"x".repeat(501)).is_valid);
        assert!(validate_address(&format!("  {}  ", "x".repeat(500))).is_valid);
    }

    #[test]
    fn test_sanitize_input() {
        assert_eq!(sanitize_input("<a>&'\""), "&lt;a&gt;&amp;&#x27;&quot;");
        assert_eq!(sanitize_input("  Night City  "), "Night City");
        assert_eq!(sanitize_input(&"z".repeat(1500)).chars().count(), 1000);
        assert_eq!(sanitize_input(&"<".repeat(500)).chars().count(), 1000);
    }

    #[test]
    fn test_looks_automated() {
        assert!(looks_automated("Googlebot/2.1"));
        assert!(looks_automated("python-requests/2.31"));
        assert!(looks_automated("curl/8.4.0"));
        assert!(!looks_automated(
            "Mozilla/5.0 (X11; Linux x86_64) Gecko/20100101 Firefox/120.0"
        ));
    }

    #[test]
    fn test_into_result() {
        assert_eq!(
            validate_name("Case").into_result("name").unwrap().as_deref(),
            Some("Case")
        );
        let err = validate_phone_number("123").into_result("phone").unwrap_err();
        assert_eq!(err.to_string(), "Invalid phone number format");
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_cart_size() {
        assert!(validate_cart_size(0).is_ok());
        assert!(validate_cart_size(99).is_ok());
        assert!(validate_cart_size(100).is_err());
    }

    // Generated passwords: one char of each class, then filler drawn from a
    // pool with no sequential runs, shuffled into place. Repeats are avoided
    // by construction (distinct chars from a small pool).
    fn strong_password() -> impl Strategy<Value = String> {
        let pool: Vec<char> = "BDFHJKMNPRTVXZbdghjkmnpruvxz2479!#%*?+=".chars().collect();
        prop::sample::subsequence(pool, 4..=30)
            .prop_shuffle()
            .prop_map(|chars| {
                let mut s: String = chars.into_iter().collect();
                s.push_str("Qy8@");
                s
            })
    }

    proptest! {
        #[test]
        fn prop_all_classes_is_valid(password in strong_password()) {
            prop_assert!(validate_password(&password).is_valid, "{}", password);
        }

        #[test]
        fn prop_removing_a_class_is_invalid(password in strong_password(), class in 0usize..4) {
            let stripped: String = password
                .chars()
                .filter(|c| match class {
                    0 => !c.is_ascii_uppercase(),
                    1 => !c.is_ascii_lowercase(),
                    2 => !c.is_ascii_digit(),
                    _ => !PASSWORD_SYMBOLS.contains(*c),
                })
                .collect();
            // Pad back to length with a char of a class still present
            let filler = if class == 1 { 'M' } else { 'k' };
            let mut padded = stripped;
            while padded.chars().count() < 8 {
                padded.push(filler);
                if padded.chars().count() < 8 {
                    padded.push(if class == 2 { '!' } else { '7' });
                }
            }
            prop_assert!(!validate_password(&padded).is_valid, "{}", padded);
        }
    }
}
