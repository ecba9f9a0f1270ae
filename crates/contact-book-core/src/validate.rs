//! Field validators for contact data.
//!
//! Both validators are shape checks only. They never reach out to DNS or a
//! numbering plan; a value that passes is merely plausible.

use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum number of digits in an accepted phone number.
pub const PHONE_MIN_DIGITS: usize = 7;
/// Maximum number of digits in an accepted phone number (E.164 limit).
pub const PHONE_MAX_DIGITS: usize = 15;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("valid email regex"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9 ()\-]+$").expect("valid phone regex"));

/// Returns `true` if `value` looks like an email address: a local part, a
/// single `@`, and a dotted domain, with no whitespace anywhere.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Returns `true` if `value` looks like a phone number.
///
/// Accepts digits with an optional leading `+` and the separators space,
/// dash and parentheses. The digit count must be within
/// [`PHONE_MIN_DIGITS`]..=[`PHONE_MAX_DIGITS`].
pub fn is_valid_phone(value: &str) -> bool {
    if !PHONE_RE.is_match(value) {
        return false;
    }
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits)
}
