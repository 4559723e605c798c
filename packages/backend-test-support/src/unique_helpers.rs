//! Test helpers for generating unique test data
//!
//! ULID-based uniqueness keeps parallel tests from colliding on the
//! `users.username` unique index.

use ulid::Ulid;

/// Generate a unique string with the given prefix, `{prefix}-{ulid}`.
///
/// # Examples
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let id1 = unique_str("room");
/// let id2 = unique_str("room");
/// assert_ne!(id1, id2);
/// assert!(id1.starts_with("room-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a unique username with the given prefix.
///
/// # Examples
/// ```
/// use backend_test_support::unique_helpers::unique_username;
///
/// let a = unique_username("host");
/// let b = unique_username("host");
/// assert_ne!(a, b);
/// ```
pub fn unique_username(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}
