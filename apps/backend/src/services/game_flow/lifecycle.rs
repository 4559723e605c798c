use rand::RngCore;
use sea_orm::DatabaseTransaction;
use tracing::{debug, info};

use super::{GameFlowService, RoomFlowOutcome};
use crate::adapters::rooms_sea::{RoomCreate, RoomUpdate};
use crate::entities::rooms::RoomStatus;
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};
use crate::repos::{rooms, rounds, users};

impl GameFlowService {
    /// Create a room in `Waiting` with the caller as host.
    pub async fn create_room(
        &self,
        txn: &DatabaseTransaction,
        host_id: i64,
        name: &str,
    ) -> Result<RoomFlowOutcome, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation(
                ValidationKind::InvalidInput,
                "Room name must not be empty",
            )
            .into());
        }

        // Hosts must resolve to a known identity; everything else about them
        // is opaque to the engine.
        users::require_user(txn, host_id).await?;

        let mut rng_seed = vec![0u8; 32];
        rand::rng().fill_bytes(&mut rng_seed);

        let room = rooms::create_room(
            txn,
            RoomCreate {
                name: name.to_string(),
                host_id,
                rng_seed,
            },
        )
        .await?;

        info!(room_id = room.id, host_id, "Room created");
        Ok(RoomFlowOutcome::from_change(None, room, None))
    }

    /// Seat a guest in a waiting room and move it to `Preparing`.
    pub async fn join_room(
        &self,
        txn: &DatabaseTransaction,
        room_id: i64,
        guest_id: i64,
    ) -> Result<RoomFlowOutcome, AppError> {
        debug!(room_id, guest_id, "Joining room");

        let room = rooms::require_room(txn, room_id).await?;

        if room.host_id == guest_id {
            return Err(DomainError::validation(
                ValidationKind::InvalidInput,
                "Host cannot join their own room as guest",
            )
            .into());
        }

        if room.guest_id.is_some() {
            return Err(DomainError::conflict(
                ConflictKind::RoomFull,
                "Room already has a guest",
            )
            .into());
        }

        if room.status != RoomStatus::Waiting {
            return Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                "Room is not open for joining",
            )
            .into());
        }

        users::require_user(txn, guest_id).await?;

        let update = RoomUpdate::new(room.id, room.lock_version)
            .with_guest(guest_id)
            .with_status(RoomStatus::Preparing);
        let updated = rooms::update_room(txn, update).await?;

        info!(room_id, guest_id, "Guest joined, room preparing");
        Ok(RoomFlowOutcome::from_change(Some(&room), updated, None))
    }

    /// Remove a player from the room.
    ///
    /// Host departure cancels the room outright; guest departure reverts it
    /// to `Waiting` for a new guest. Both end the current instance: secrets,
    /// turn, winner and the instance's rounds are cleared atomically.
    pub async fn leave_room(
        &self,
        txn: &DatabaseTransaction,
        room_id: i64,
        player_id: i64,
    ) -> Result<RoomFlowOutcome, AppError> {
        debug!(room_id, player_id, "Leaving room");

        let room = rooms::require_room(txn, room_id).await?;

        if player_id == room.host_id {
            if room.status == RoomStatus::Cancelled {
                // Repeated leave after cancellation is a no-op.
                return Ok(RoomFlowOutcome::unchanged(room));
            }

            let purged = rounds::purge_instance(txn, room.id, room.instance_no).await?;
            let update = RoomUpdate::new(room.id, room.lock_version)
                .with_status(RoomStatus::Cancelled)
                .clear_guest()
                .clear_secrets()
                .clear_turn()
                .clear_winner()
                .with_instance_no(room.instance_no + 1);
            let updated = rooms::update_room(txn, update).await?;

            info!(room_id, player_id, purged, "Host left, room cancelled");
            return Ok(RoomFlowOutcome::from_change(Some(&room), updated, None));
        }

        if room.guest_id == Some(player_id) {
            // Host is still seated, so the room reverts to Waiting rather
            // than cancelling.
            let purged = rounds::purge_instance(txn, room.id, room.instance_no).await?;
            let update = RoomUpdate::new(room.id, room.lock_version)
                .with_status(RoomStatus::Waiting)
                .clear_guest()
                .clear_secrets()
                .clear_turn()
                .clear_winner()
                .with_instance_no(room.instance_no + 1);
            let updated = rooms::update_room(txn, update).await?;

            info!(room_id, player_id, purged, "Guest left, room back to waiting");
            return Ok(RoomFlowOutcome::from_change(Some(&room), updated, None));
        }

        Err(DomainError::validation(
            ValidationKind::NotInRoom,
            format!("Player {player_id} is not in room {room_id}"),
        )
        .into())
    }

    /// Start a fresh instance of a completed game with the same players.
    pub async fn restart_room(
        &self,
        txn: &DatabaseTransaction,
        room_id: i64,
    ) -> Result<RoomFlowOutcome, AppError> {
        debug!(room_id, "Restarting room");

        let room = rooms::require_room(txn, room_id).await?;

        if room.status != RoomStatus::Completed {
            return Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                "Only a completed game can be restarted",
            )
            .into());
        }

        let purged = rounds::purge_instance(txn, room.id, room.instance_no).await?;
        let update = RoomUpdate::new(room.id, room.lock_version)
            .with_status(RoomStatus::Preparing)
            .clear_secrets()
            .clear_turn()
            .clear_winner()
            .with_instance_no(room.instance_no + 1);
        let updated = rooms::update_room(txn, update).await?;

        info!(
            room_id,
            purged,
            instance_no = updated.instance_no,
            "Room restarted, new instance preparing"
        );
        Ok(RoomFlowOutcome::from_change(Some(&room), updated, None))
    }
}
