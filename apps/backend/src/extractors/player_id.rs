use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::error::AppError;
use crate::errors::ErrorCode;

/// Acting player's identity, taken from the `x-player-id` header.
///
/// Identity is supplied by an external collaborator; the engine only ever
/// compares ids for equality, so the raw id is all it needs.
#[derive(Debug, Clone, Copy)]
pub struct PlayerId(pub i64);

impl FromRequest for PlayerId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(extract_player_id(req))
    }
}

fn extract_player_id(req: &HttpRequest) -> Result<PlayerId, AppError> {
    let raw = req
        .headers()
        .get("x-player-id")
        .ok_or_else(|| {
            AppError::bad_request(
                ErrorCode::InvalidHeader,
                "Missing x-player-id header".to_string(),
            )
        })?
        .to_str()
        .map_err(|_| {
            AppError::bad_request(
                ErrorCode::InvalidHeader,
                "x-player-id header is not valid UTF-8".to_string(),
            )
        })?;

    let player_id = raw.parse::<i64>().map_err(|_| {
        AppError::bad_request(
            ErrorCode::InvalidHeader,
            format!("Invalid player id: {raw}"),
        )
    })?;

    if player_id <= 0 {
        return Err(AppError::bad_request(
            ErrorCode::InvalidHeader,
            format!("Player id must be positive, got: {player_id}"),
        ));
    }

    Ok(PlayerId(player_id))
}
