//! Redaction for raw error strings before they reach log output.
//!
//! Raw database errors can echo back whole rows. Player secrets never appear
//! in log fields on the happy path, but an echoed row or a pasted connection
//! string must not leak emails or opaque tokens either, so anything logged
//! under `raw_error` goes through [`Redacted`].

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").expect("valid email regex")
});

static TOKEN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z0-9+/]{16,}={0,2}\b").expect("valid token regex"));

/// Redacts sensitive information from a string.
///
/// - Emails: keeps the first character of the local part and the domain.
/// - Opaque tokens: replaces base64/hex runs (>=16 chars) with [REDACTED_TOKEN].
pub fn redact(input: &str) -> String {
    let email_redacted = EMAIL_REGEX.replace_all(input, |caps: &regex::Captures| {
        let full_match = &caps[0];
        match full_match.find('@') {
            Some(at_pos) if at_pos > 0 => {
                let first_char = &full_match[..1];
                let domain = &full_match[at_pos..];
                format!("{first_char}***{domain}")
            }
            _ => full_match.to_string(),
        }
    });

    TOKEN_REGEX
        .replace_all(&email_redacted, "[REDACTED_TOKEN]")
        .to_string()
}

/// A wrapper that automatically redacts sensitive strings when displayed.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", redact(self.0))
    }
}
