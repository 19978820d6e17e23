//! Email syntax validation for the landing form.

use std::sync::OnceLock;

use regex::Regex;

/// Shown when the trimmed input is empty.
pub const EMAIL_REQUIRED: &str = "Email is required";
/// Shown when the input is non-empty but fails the syntax predicate.
pub const EMAIL_INVALID: &str = "Enter a valid company email";

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)] // compile-time literal pattern
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}

/// Whether `email`, after trimming surrounding whitespace, is syntactically
/// a plausible address: local part, `@`, domain, `.`, suffix.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email.trim())
}

/// User-facing error for the email field, or `None` when the input is fine.
#[must_use]
pub fn email_error(email: &str) -> Option<&'static str> {
    if email.trim().is_empty() {
        return Some(EMAIL_REQUIRED);
    }

    if !is_valid_email(email) {
        return Some(EMAIL_INVALID);
    }

    None
}
