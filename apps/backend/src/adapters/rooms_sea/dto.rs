//! DTOs for rooms_sea adapter.

use crate::entities::rooms::RoomStatus;

/// DTO for creating a new room.
#[derive(Debug, Clone)]
pub struct RoomCreate {
    pub name: String,
    pub host_id: i64,
    pub rng_seed: Vec<u8>,
}

/// Unified DTO for updating room fields with optimistic locking.
///
/// Any combination of fields can change; the write is a single UPDATE with
/// one version increment, so a transition's fields move together or not at
/// all. Nullable columns use the three-state pattern:
/// None = no change, Some(Some(v)) = set, Some(None) = clear.
#[derive(Debug, Clone)]
pub struct RoomUpdate {
    pub id: i64,
    pub expected_version: i32,
    pub status: Option<RoomStatus>,
    pub guest_id: Option<Option<i64>>,
    pub host_secret: Option<Option<String>>,
    pub guest_secret: Option<Option<String>>,
    pub current_turn_player_id: Option<Option<i64>>,
    pub winner_id: Option<Option<i64>>,
    pub instance_no: Option<i32>,
}

impl RoomUpdate {
    pub fn new(id: i64, expected_version: i32) -> Self {
        Self {
            id,
            expected_version,
            status: None,
            guest_id: None,
            host_secret: None,
            guest_secret: None,
            current_turn_player_id: None,
            winner_id: None,
            instance_no: None,
        }
    }

    pub fn with_status(mut self, status: RoomStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_guest(mut self, guest_id: i64) -> Self {
        self.guest_id = Some(Some(guest_id));
        self
    }

    pub fn clear_guest(mut self) -> Self {
        self.guest_id = Some(None);
        self
    }

    pub fn with_host_secret(mut self, secret: impl Into<String>) -> Self {
        self.host_secret = Some(Some(secret.into()));
        self
    }

    pub fn with_guest_secret(mut self, secret: impl Into<String>) -> Self {
        self.guest_secret = Some(Some(secret.into()));
        self
    }

    pub fn clear_secrets(mut self) -> Self {
        self.host_secret = Some(None);
        self.guest_secret = Some(None);
        self
    }

    pub fn with_turn(mut self, player_id: i64) -> Self {
        self.current_turn_player_id = Some(Some(player_id));
        self
    }

    pub fn clear_turn(mut self) -> Self {
        self.current_turn_player_id = Some(None);
        self
    }

    pub fn with_winner(mut self, player_id: i64) -> Self {
        self.winner_id = Some(Some(player_id));
        self
    }

    pub fn clear_winner(mut self) -> Self {
        self.winner_id = Some(None);
        self
    }

    pub fn with_instance_no(mut self, instance_no: i32) -> Self {
        self.instance_no = Some(instance_no);
        self
    }
}
