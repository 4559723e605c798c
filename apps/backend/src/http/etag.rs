//! ETag helpers for optimistic concurrency control.
//!
//! Room snapshots carry an ETag derived from the room's lock version, so
//! clients can poll with `If-None-Match` and get `304 Not Modified` until a
//! mutation lands.

use crate::error::AppError;
use crate::errors::ErrorCode;

/// Generate an ETag for a room resource.
///
/// Format: `"room-{id}-v{version}"` (with quotes, as required by HTTP spec)
///
/// # Example
/// ```
/// # use backend::http::etag::room_etag;
/// let etag = room_etag(123, 5);
/// assert_eq!(etag, r#""room-123-v5""#);
/// ```
pub fn room_etag(id: i64, version: i32) -> String {
    format!(r#""room-{id}-v{version}""#)
}

/// Parse the lock version from a room ETag value.
///
/// # Errors
/// Returns `AppError::bad_request` with `ErrorCode::InvalidHeader` if the
/// ETag is malformed or the version is not an integer.
pub fn parse_room_version_from_etag(s: &str) -> Result<i32, AppError> {
    let s = s.trim_matches('"');

    let version_prefix = "-v";
    let version_start = s
        .rfind(version_prefix)
        .ok_or_else(|| {
            AppError::bad_request(
                ErrorCode::InvalidHeader,
                format!("Invalid ETag format: missing version marker. Expected format: \"room-{{id}}-v{{version}}\", got: \"{s}\""),
            )
        })?
        + version_prefix.len();

    let version_str = &s[version_start..];
    version_str.parse::<i32>().map_err(|_| {
        AppError::bad_request(
            ErrorCode::InvalidHeader,
            format!("Invalid ETag format: version must be a valid integer, got: \"{version_str}\""),
        )
    })
}
