use sea_orm::DatabaseTransaction;
use tracing::{debug, info};

use super::{GameFlowService, RoomFlowOutcome};
use crate::adapters::rooms_sea::RoomUpdate;
use crate::domain::code::Code;
use crate::domain::evaluator::exact_matches;
use crate::domain::seed_derivation::{derive_turn_seed, starting_turn_is_host};
use crate::entities::rooms::RoomStatus;
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, ValidationKind};
use crate::repos::{rooms, rounds};

impl GameFlowService {
    /// Submit a player's secret during `Preparing`.
    ///
    /// Secrets are write-once per instance. When the second secret lands,
    /// the starting player is drawn from the room's seed and the game moves
    /// to `Playing` in the same update.
    pub async fn submit_secret(
        &self,
        txn: &DatabaseTransaction,
        room_id: i64,
        player_id: i64,
        raw_code: &str,
    ) -> Result<RoomFlowOutcome, AppError> {
        let code = Code::parse(raw_code)?;

        debug!(room_id, player_id, "Submitting secret");

        let room = rooms::require_room(txn, room_id).await?;

        if !room.is_member(player_id) {
            return Err(DomainError::validation(
                ValidationKind::NotInRoom,
                format!("Player {player_id} is not in room {room_id}"),
            )
            .into());
        }

        if room.status != RoomStatus::Preparing {
            return Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                "Secrets can only be submitted while preparing",
            )
            .into());
        }

        if room.own_secret_of(player_id).is_some() {
            return Err(DomainError::conflict(
                ConflictKind::SecretAlreadySubmitted,
                "Secret already submitted for this game",
            )
            .into());
        }

        let is_host = player_id == room.host_id;
        let mut update = RoomUpdate::new(room.id, room.lock_version);
        if is_host {
            update = update.with_host_secret(code.to_string());
        } else {
            update = update.with_guest_secret(code.to_string());
        }

        // Preparing implies a seated guest; a missing one is corrupt state.
        let guest_id = room.guest_id.ok_or_else(|| {
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                "Preparing room has no guest",
            )
        })?;

        let opponent_ready = if is_host {
            room.guest_secret.is_some()
        } else {
            room.host_secret.is_some()
        };

        if opponent_ready {
            // Both secrets are in: draw the starting player and begin.
            let seed = derive_turn_seed(&room.rng_seed, room.instance_no);
            let first_turn = if starting_turn_is_host(seed) {
                room.host_id
            } else {
                guest_id
            };
            update = update.with_status(RoomStatus::Playing).with_turn(first_turn);
        }

        let updated = rooms::update_room(txn, update).await?;

        info!(
            room_id,
            player_id,
            started = opponent_ready,
            "Secret accepted"
        );
        Ok(RoomFlowOutcome::from_change(Some(&room), updated, None))
    }

    /// Score one guess against the opponent's secret.
    ///
    /// The turn gate here is the authoritative check: a stale client cannot
    /// move out of turn no matter what its local state claims.
    pub async fn submit_guess(
        &self,
        txn: &DatabaseTransaction,
        room_id: i64,
        player_id: i64,
        raw_guess: &str,
    ) -> Result<RoomFlowOutcome, AppError> {
        let guess = Code::parse(raw_guess)?;

        debug!(room_id, player_id, "Submitting guess");

        let room = rooms::require_room(txn, room_id).await?;

        if !room.is_member(player_id) {
            return Err(DomainError::validation(
                ValidationKind::NotInRoom,
                format!("Player {player_id} is not in room {room_id}"),
            )
            .into());
        }

        if room.status != RoomStatus::Playing {
            return Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                "Game is not in a playable state",
            )
            .into());
        }

        if room.current_turn_player_id != Some(player_id) {
            return Err(DomainError::validation(
                ValidationKind::OutOfTurn,
                "It is not your turn",
            )
            .into());
        }

        let secret_raw = room.opponent_secret_of(player_id).ok_or_else(|| {
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                "Playing room is missing a secret",
            )
        })?;
        // Stored secrets were validated on the way in; failing to re-parse
        // one means the row was tampered with.
        let secret = Code::parse(secret_raw).map_err(|_| {
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                "Stored secret is not a valid code",
            )
        })?;

        let match_count = exact_matches(&guess, &secret) as i16;

        let round_number = rounds::next_round_number(txn, room.id, room.instance_no).await?;
        let round = rounds::record_guess(
            txn,
            room.id,
            room.instance_no,
            player_id,
            guess.to_string(),
            match_count,
            round_number,
        )
        .await?;

        let update = if match_count == 4 {
            RoomUpdate::new(room.id, room.lock_version)
                .with_status(RoomStatus::Completed)
                .with_winner(player_id)
                .clear_turn()
        } else {
            let opponent = room.opponent_of(player_id).ok_or_else(|| {
                DomainError::infra(
                    InfraErrorKind::DataCorruption,
                    "Playing room has no opponent to pass the turn to",
                )
            })?;
            RoomUpdate::new(room.id, room.lock_version).with_turn(opponent)
        };
        let updated = rooms::update_room(txn, update).await?;

        info!(
            room_id,
            player_id,
            round_number,
            match_count,
            completed = match_count == 4,
            "Guess scored"
        );
        Ok(RoomFlowOutcome::from_change(
            Some(&room),
            updated,
            Some(round),
        ))
    }
}
