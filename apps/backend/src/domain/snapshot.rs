//! Public views of room state.
//!
//! A snapshot is what leaves the engine: it is the payload of `RoomChanged`
//! events and of the snapshot endpoint. Secrets never appear in it; each
//! player learns about the opponent's code only through match counts.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::entities::rooms::RoomStatus;

/// Post-state view of a room, safe for any subscriber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub id: i64,
    pub name: String,
    pub status: RoomStatus,
    pub host_id: i64,
    pub guest_id: Option<i64>,
    /// True per seat once that player's secret is in for this instance.
    pub host_ready: bool,
    pub guest_ready: bool,
    pub current_turn_player_id: Option<i64>,
    pub winner_id: Option<i64>,
    pub instance_no: i32,
    pub updated_at: OffsetDateTime,
    pub lock_version: i32,
}

/// One guess event as delivered to subscribers and the rounds endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundView {
    pub id: i64,
    pub room_id: i64,
    pub player_id: i64,
    pub guess_digits: String,
    pub match_count: i16,
    pub round_number: i16,
    pub created_at: OffsetDateTime,
}
