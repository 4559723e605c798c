//! Round ledger: round numbering, guess history, instance purges.
//!
//! All counting is scoped to a room's current instance; rows from earlier
//! instances are invisible to active queries even if a partial failure ever
//! left them behind.

use sea_orm::ConnectionTrait;

use crate::adapters::rounds_sea::{self, RoundCreate};
use crate::domain::pairing::round_number_for;
use crate::domain::snapshot::RoundView;
use crate::entities::game_rounds;
use crate::errors::domain::DomainError;
use crate::infra::db_errors::map_db_err;

/// Round domain model
#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    pub id: i64,
    pub room_id: i64,
    pub instance_no: i32,
    pub player_id: i64,
    pub guess_digits: String,
    pub match_count: i16,
    pub round_number: i16,
    pub created_at: time::OffsetDateTime,
}

impl Round {
    /// View delivered to subscribers and the rounds endpoint.
    pub fn view(&self) -> RoundView {
        RoundView {
            id: self.id,
            room_id: self.room_id,
            player_id: self.player_id,
            guess_digits: self.guess_digits.clone(),
            match_count: self.match_count,
            round_number: self.round_number,
            created_at: self.created_at,
        }
    }
}

impl From<game_rounds::Model> for Round {
    fn from(model: game_rounds::Model) -> Self {
        Self {
            id: model.id,
            room_id: model.room_id,
            instance_no: model.instance_no,
            player_id: model.player_id,
            guess_digits: model.guess_digits,
            match_count: model.match_count,
            round_number: model.round_number,
            created_at: model.created_at,
        }
    }
}

/// Round number the next guess in this instance will get.
///
/// Counts the guesses already recorded, then applies the pairing rule. Must
/// run inside the same transaction (and room guard) as the insert so the
/// count cannot race.
pub async fn next_round_number<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    instance_no: i32,
) -> Result<i16, DomainError> {
    let guesses_before = rounds_sea::count_by_room_and_instance(conn, room_id, instance_no)
        .await
        .map_err(map_db_err)?;
    Ok(round_number_for(guesses_before))
}

/// Persist one scored guess.
pub async fn record_guess<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    instance_no: i32,
    player_id: i64,
    guess_digits: String,
    match_count: i16,
    round_number: i16,
) -> Result<Round, DomainError> {
    let dto = RoundCreate {
        room_id,
        instance_no,
        player_id,
        guess_digits,
        match_count,
        round_number,
    };
    let round = rounds_sea::create_round(conn, dto)
        .await
        .map_err(map_db_err)?;
    Ok(Round::from(round))
}

/// Ordered guess history of the current instance.
pub async fn active_rounds<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    instance_no: i32,
) -> Result<Vec<Round>, DomainError> {
    let rounds = rounds_sea::find_by_room_and_instance(conn, room_id, instance_no)
        .await
        .map_err(map_db_err)?;
    Ok(rounds.into_iter().map(Round::from).collect())
}

/// Guesses one player made in one instance (statistics hand-off).
pub async fn count_player_guesses<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    instance_no: i32,
    player_id: i64,
) -> Result<u64, DomainError> {
    rounds_sea::count_by_player_in_instance(conn, room_id, instance_no, player_id)
        .await
        .map_err(map_db_err)
}

/// Delete one instance's rounds; atomic with the owning transition's
/// transaction. Returns how many rows were purged.
pub async fn purge_instance<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    instance_no: i32,
) -> Result<u64, DomainError> {
    rounds_sea::delete_by_room_and_instance(conn, room_id, instance_no)
        .await
        .map_err(map_db_err)
}
