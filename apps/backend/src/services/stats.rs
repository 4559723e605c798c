//! Statistics hand-off.
//!
//! On a Completed transition the engine signals "game finished" for both
//! players. The aggregation itself is eventually consistent: it runs in a
//! spawned task with its own transaction, and a failure is logged, never
//! propagated to the player whose guess finished the game.

use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{info, warn};

use crate::repos::{rounds, users};

pub struct StatsService;

impl StatsService {
    /// Fire-and-forget: fold a finished game into both players' counters.
    ///
    /// `instance_no` is the instance that just completed (the room row may
    /// already be on a later instance by the time this runs; the ledger rows
    /// are still keyed by the finished one until a restart purges them).
    pub fn spawn_record_finished(
        db: DatabaseConnection,
        room_id: i64,
        instance_no: i32,
        host_id: i64,
        guest_id: i64,
        winner_id: i64,
    ) {
        tokio::spawn(async move {
            if let Err(err) =
                record_finished(&db, room_id, instance_no, host_id, guest_id, winner_id).await
            {
                warn!(
                    room_id,
                    instance_no,
                    error = %err,
                    "Failed to record game statistics"
                );
            }
        });
    }
}

async fn record_finished(
    db: &DatabaseConnection,
    room_id: i64,
    instance_no: i32,
    host_id: i64,
    guest_id: i64,
    winner_id: i64,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let txn = db.begin().await?;

    let host_rounds = rounds::count_player_guesses(&txn, room_id, instance_no, host_id).await?;
    let guest_rounds = rounds::count_player_guesses(&txn, room_id, instance_no, guest_id).await?;

    users::record_game_result(&txn, host_id, winner_id == host_id, host_rounds as i32).await?;
    users::record_game_result(&txn, guest_id, winner_id == guest_id, guest_rounds as i32).await?;

    txn.commit().await?;

    info!(
        room_id,
        instance_no, host_id, guest_id, winner_id, "Game statistics recorded"
    );
    Ok(())
}
