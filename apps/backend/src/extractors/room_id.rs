use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::db::require_db;
use crate::db::txn::SharedTxn;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::repos::rooms;
use crate::state::app_state::AppState;

/// Room ID extracted from the route path parameter.
/// Validates that the room exists in the database.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RoomId(pub i64);

impl FromRequest for RoomId {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let room_id_str = req.match_info().get("room_id").ok_or_else(|| {
                AppError::bad_request(
                    ErrorCode::InvalidRoomId,
                    "Missing room_id parameter".to_string(),
                )
            })?;

            let room_id = room_id_str.parse::<i64>().map_err(|_| {
                AppError::bad_request(
                    ErrorCode::InvalidRoomId,
                    format!("Invalid room id: {room_id_str}"),
                )
            })?;

            if room_id <= 0 {
                return Err(AppError::bad_request(
                    ErrorCode::InvalidRoomId,
                    format!("Room id must be positive, got: {room_id}"),
                ));
            }

            let app_state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
                AppError::internal("AppState not available".to_string())
            })?;

            // Check existence through the shared test transaction when one
            // is injected, so uncommitted rows are visible.
            let exists = if let Some(shared_txn) = SharedTxn::from_req(&req) {
                rooms::find_by_id(shared_txn.transaction(), room_id)
                    .await?
                    .is_some()
            } else {
                let db = require_db(app_state)?;
                rooms::find_by_id(db, room_id).await?.is_some()
            };

            if !exists {
                return Err(AppError::not_found(
                    ErrorCode::RoomNotFound,
                    format!("Room {room_id} not found"),
                ));
            }

            Ok(RoomId(room_id))
        })
    }
}
