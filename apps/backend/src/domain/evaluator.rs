//! Guess scoring.
//!
//! This game variant only reports exact-position matches. There is no
//! "right digit, wrong position" signal.

use crate::domain::code::Code;

/// Count positions where guess and secret hold the same digit.
///
/// Result is always in `0..=4`; a result of 4 means the code is cracked.
pub fn exact_matches(guess: &Code, secret: &Code) -> u8 {
    guess
        .digits()
        .iter()
        .zip(secret.digits().iter())
        .filter(|(g, s)| g == s)
        .count() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(raw: &str) -> Code {
        Code::parse(raw).unwrap()
    }

    #[test]
    fn full_match() {
        assert_eq!(exact_matches(&code("1234"), &code("1234")), 4);
    }

    #[test]
    fn no_match() {
        assert_eq!(exact_matches(&code("5678"), &code("1234")), 0);
    }

    #[test]
    fn partial_matches() {
        assert_eq!(exact_matches(&code("1239"), &code("1234")), 3);
        assert_eq!(exact_matches(&code("1204"), &code("1234")), 3);
        assert_eq!(exact_matches(&code("1004"), &code("1234")), 2);
        assert_eq!(exact_matches(&code("9994"), &code("1234")), 1);
    }

    #[test]
    fn right_digit_wrong_position_scores_zero() {
        // 4321 is a permutation of 1234 with every digit displaced
        assert_eq!(exact_matches(&code("4321"), &code("1234")), 0);
    }

    #[test]
    fn repeated_digits() {
        assert_eq!(exact_matches(&code("1111"), &code("1211")), 3);
        assert_eq!(exact_matches(&code("2222"), &code("2222")), 4);
    }
}
