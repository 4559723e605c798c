//! Error codes for the Codebreak backend API.
//!
//! This module defines all error codes used throughout the application.
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses.

use core::fmt;

/// Centralized error codes for the Codebreak backend API.
///
/// This enum ensures type safety and prevents the use of ad-hoc error codes.
/// Each variant maps to a canonical SCREAMING_SNAKE_CASE string that appears
/// in HTTP responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request Validation
    /// Malformed request input (empty name, bad id)
    InvalidInput,
    /// Guess or secret is not exactly 4 decimal digits
    InvalidGuessFormat,
    /// Invalid room ID provided
    InvalidRoomId,
    /// Invalid or missing HTTP header
    InvalidHeader,
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,

    // Game Rules
    /// Action invalid for the room's current status
    GameNotInPlayableState,
    /// Player acted out of turn
    NotYourTurn,
    /// Player is neither host nor guest
    PlayerNotInGame,

    // Resource Not Found
    /// Room not found
    RoomNotFound,
    /// User not found
    UserNotFound,
    /// General not found error
    NotFound,

    // Business Logic Conflicts
    /// Guest seat already taken
    RoomFull,
    /// Player already submitted a secret this instance
    SecretAlreadySubmitted,
    /// Optimistic lock conflict on a room update
    ConcurrentModification,
    /// Username already taken
    UniqueUsername,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System Errors
    /// Database error
    DbError,
    /// Persistence layer unavailable or timing out
    StorageUnavailable,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
    /// Data corruption detected
    DataCorruption,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    ///
    /// This is the exact string that appears in HTTP responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            // Request Validation
            Self::InvalidInput => "INVALID_INPUT",
            Self::InvalidGuessFormat => "INVALID_GUESS_FORMAT",
            Self::InvalidRoomId => "INVALID_ROOM_ID",
            Self::InvalidHeader => "INVALID_HEADER",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",

            // Game Rules
            Self::GameNotInPlayableState => "GAME_NOT_IN_PLAYABLE_STATE",
            Self::NotYourTurn => "NOT_YOUR_TURN",
            Self::PlayerNotInGame => "PLAYER_NOT_IN_GAME",

            // Resource Not Found
            Self::RoomNotFound => "ROOM_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            // Business Logic Conflicts
            Self::RoomFull => "ROOM_FULL",
            Self::SecretAlreadySubmitted => "SECRET_ALREADY_SUBMITTED",
            Self::ConcurrentModification => "CONCURRENT_MODIFICATION",
            Self::UniqueUsername => "UNIQUE_USERNAME",
            Self::Conflict => "CONFLICT",

            // System Errors
            Self::DbError => "DB_ERROR",
            Self::StorageUnavailable => "STORAGE_UNAVAILABLE",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
            Self::DataCorruption => "DATA_CORRUPTION",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_strings() {
        assert_eq!(ErrorCode::InvalidInput.as_str(), "INVALID_INPUT");
        assert_eq!(ErrorCode::InvalidGuessFormat.as_str(), "INVALID_GUESS_FORMAT");
        assert_eq!(ErrorCode::InvalidRoomId.as_str(), "INVALID_ROOM_ID");
        assert_eq!(ErrorCode::InvalidHeader.as_str(), "INVALID_HEADER");
        assert_eq!(ErrorCode::ValidationError.as_str(), "VALIDATION_ERROR");
        assert_eq!(ErrorCode::BadRequest.as_str(), "BAD_REQUEST");
        assert_eq!(
            ErrorCode::GameNotInPlayableState.as_str(),
            "GAME_NOT_IN_PLAYABLE_STATE"
        );
        assert_eq!(ErrorCode::NotYourTurn.as_str(), "NOT_YOUR_TURN");
        assert_eq!(ErrorCode::PlayerNotInGame.as_str(), "PLAYER_NOT_IN_GAME");
        assert_eq!(ErrorCode::RoomNotFound.as_str(), "ROOM_NOT_FOUND");
        assert_eq!(ErrorCode::UserNotFound.as_str(), "USER_NOT_FOUND");
        assert_eq!(ErrorCode::NotFound.as_str(), "NOT_FOUND");
        assert_eq!(ErrorCode::RoomFull.as_str(), "ROOM_FULL");
        assert_eq!(
            ErrorCode::SecretAlreadySubmitted.as_str(),
            "SECRET_ALREADY_SUBMITTED"
        );
        assert_eq!(
            ErrorCode::ConcurrentModification.as_str(),
            "CONCURRENT_MODIFICATION"
        );
        assert_eq!(ErrorCode::UniqueUsername.as_str(), "UNIQUE_USERNAME");
        assert_eq!(ErrorCode::Conflict.as_str(), "CONFLICT");
        assert_eq!(ErrorCode::DbError.as_str(), "DB_ERROR");
        assert_eq!(ErrorCode::StorageUnavailable.as_str(), "STORAGE_UNAVAILABLE");
        assert_eq!(ErrorCode::Internal.as_str(), "INTERNAL");
        assert_eq!(ErrorCode::ConfigError.as_str(), "CONFIG_ERROR");
        assert_eq!(ErrorCode::DataCorruption.as_str(), "DATA_CORRUPTION");
    }

    #[test]
    fn test_display_trait() {
        assert_eq!(format!("{}", ErrorCode::NotYourTurn), "NOT_YOUR_TURN");
        assert_eq!(format!("{}", ErrorCode::RoomFull), "ROOM_FULL");
        assert_eq!(
            format!("{}", ErrorCode::ConcurrentModification),
            "CONCURRENT_MODIFICATION"
        );
    }
}
