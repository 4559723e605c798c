//! Validated 4-digit codes.
//!
//! Both secrets and guesses share the same shape: exactly four decimal
//! digits, leading zeros allowed. Parsing happens once at the boundary;
//! everything past it works with the validated type.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::domain::{DomainError, ValidationKind};

/// Number of digits in a secret or guess.
pub const CODE_LEN: usize = 4;

static CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}$").expect("valid code regex"));

/// A validated 4-digit code (digit values 0-9 per position).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Code([u8; CODE_LEN]);

impl Code {
    /// Parse a raw string into a code.
    ///
    /// Anything that is not exactly four ASCII decimal digits is rejected
    /// with `InvalidGuessFormat`.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if !CODE_RE.is_match(raw) {
            return Err(DomainError::validation(
                ValidationKind::InvalidGuessFormat,
                format!("Code must be exactly {CODE_LEN} decimal digits"),
            ));
        }

        let mut digits = [0u8; CODE_LEN];
        for (i, b) in raw.bytes().enumerate() {
            digits[i] = b - b'0';
        }
        Ok(Self(digits))
    }

    pub fn digits(&self) -> &[u8; CODE_LEN] {
        &self.0
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in &self.0 {
            write!(f, "{d}")?;
        }
        Ok(())
    }
}
