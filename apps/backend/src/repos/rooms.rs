//! Room repository functions for the domain layer.

use sea_orm::ConnectionTrait;

use crate::adapters::rooms_sea::{self, RoomCreate, RoomUpdate};
use crate::domain::room_transition::RoomLifecycleView;
use crate::domain::snapshot::RoomSnapshot;
use crate::entities::rooms;
use crate::entities::rooms::RoomStatus;
use crate::errors::domain::DomainError;
use crate::infra::db_errors::map_db_err;

/// Room domain model (includes secrets; never leaves the engine as-is).
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: i64,
    pub name: String,
    pub status: RoomStatus,
    pub host_id: i64,
    pub guest_id: Option<i64>,
    pub host_secret: Option<String>,
    pub guest_secret: Option<String>,
    pub current_turn_player_id: Option<i64>,
    pub winner_id: Option<i64>,
    pub instance_no: i32,
    pub rng_seed: Vec<u8>,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
    pub lock_version: i32,
}

impl Room {
    /// True if the player occupies either seat.
    pub fn is_member(&self, player_id: i64) -> bool {
        self.host_id == player_id || self.guest_id == Some(player_id)
    }

    /// The other seat's occupant, if both seats are filled and the player is
    /// one of them.
    pub fn opponent_of(&self, player_id: i64) -> Option<i64> {
        let guest_id = self.guest_id?;
        if player_id == self.host_id {
            Some(guest_id)
        } else if player_id == guest_id {
            Some(self.host_id)
        } else {
            None
        }
    }

    /// The secret this player is trying to crack (the opponent's).
    pub fn opponent_secret_of(&self, player_id: i64) -> Option<&str> {
        if player_id == self.host_id {
            self.guest_secret.as_deref()
        } else if self.guest_id == Some(player_id) {
            self.host_secret.as_deref()
        } else {
            None
        }
    }

    /// The secret this player has submitted, if any.
    pub fn own_secret_of(&self, player_id: i64) -> Option<&str> {
        if player_id == self.host_id {
            self.host_secret.as_deref()
        } else if self.guest_id == Some(player_id) {
            self.guest_secret.as_deref()
        } else {
            None
        }
    }

    /// Slice of state used for transition derivation.
    pub fn lifecycle_view(&self) -> RoomLifecycleView {
        RoomLifecycleView {
            lock_version: self.lock_version,
            status: self.status.clone(),
            guest_id: self.guest_id,
            turn: self.current_turn_player_id,
            winner_id: self.winner_id,
            instance_no: self.instance_no,
        }
    }

    /// Public snapshot: everything a subscriber may see. No secrets.
    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            id: self.id,
            name: self.name.clone(),
            status: self.status.clone(),
            host_id: self.host_id,
            guest_id: self.guest_id,
            host_ready: self.host_secret.is_some(),
            guest_ready: self.guest_secret.is_some(),
            current_turn_player_id: self.current_turn_player_id,
            winner_id: self.winner_id,
            instance_no: self.instance_no,
            updated_at: self.updated_at,
            lock_version: self.lock_version,
        }
    }
}

impl From<rooms::Model> for Room {
    fn from(model: rooms::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            status: model.status,
            host_id: model.host_id,
            guest_id: model.guest_id,
            host_secret: model.host_secret,
            guest_secret: model.guest_secret,
            current_turn_player_id: model.current_turn_player_id,
            winner_id: model.winner_id,
            instance_no: model.instance_no,
            rng_seed: model.rng_seed,
            created_at: model.created_at,
            updated_at: model.updated_at,
            lock_version: model.lock_version,
        }
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<Option<Room>, DomainError> {
    let room = rooms_sea::find_by_id(conn, room_id)
        .await
        .map_err(map_db_err)?;
    Ok(room.map(Room::from))
}

pub async fn require_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<Room, DomainError> {
    let room = rooms_sea::require_room(conn, room_id)
        .await
        .map_err(map_db_err)?;
    Ok(Room::from(room))
}

/// Rooms a new guest could join.
pub async fn list_waiting<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<Room>, DomainError> {
    let rooms = rooms_sea::list_by_status(conn, RoomStatus::Waiting)
        .await
        .map_err(map_db_err)?;
    Ok(rooms.into_iter().map(Room::from).collect())
}

pub async fn create_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: RoomCreate,
) -> Result<Room, DomainError> {
    let room = rooms_sea::create_room(conn, dto)
        .await
        .map_err(map_db_err)?;
    Ok(Room::from(room))
}

pub async fn update_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: RoomUpdate,
) -> Result<Room, DomainError> {
    let room = rooms_sea::update_room(conn, dto)
        .await
        .map_err(map_db_err)?;
    Ok(Room::from(room))
}
