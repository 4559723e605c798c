//! Shared integration-test support.
//!
//! Tests run against an in-memory sqlite database migrated by the same
//! runner production uses. A single pooled connection keeps every handle on
//! the same database.

use backend::error::AppError;
use backend::repos::users;
use backend::state::app_state::AppState;
use backend_test_support::unique_helpers::unique_username;
use sea_orm::{ConnectOptions, Database};

pub async fn build_test_state() -> Result<AppState, AppError> {
    backend_test_support::test_logging::init();

    let mut opts = ConnectOptions::new("sqlite::memory:".to_string());
    opts.max_connections(1).sqlx_logging(false);

    let conn = Database::connect(opts)
        .await
        .map_err(|e| AppError::storage_unavailable(format!("sqlite connect failed: {e}")))?;

    migration::migrate(&conn, migration::MigrationCommand::Up)
        .await
        .map_err(|e| AppError::config(format!("Migration failed: {e}")))?;

    backend::build_state().with_connection(conn).build().await
}

/// Create a user with a unique name and return its id.
pub async fn seed_user(state: &AppState, prefix: &str) -> Result<i64, AppError> {
    let db = state
        .db()
        .ok_or_else(|| AppError::config("test state has no db".to_string()))?;
    let user = users::create_user(db, unique_username(prefix)).await?;
    Ok(user.id)
}

/// Create host + guest users and a room the guest has joined (Preparing).
pub async fn seed_joined_room(state: &AppState) -> Result<(i64, i64, i64), AppError> {
    use backend::db::txn::with_txn;
    use backend::services::game_flow::GameFlowService;

    let host_id = seed_user(state, "host").await?;
    let guest_id = seed_user(state, "guest").await?;

    let room_id = with_txn(None, state, |txn| {
        Box::pin(async move {
            let service = GameFlowService::new();
            let created = service.create_room(txn, host_id, "test room").await?;
            service.join_room(txn, created.room.id, guest_id).await?;
            Ok::<_, AppError>(created.room.id)
        })
    })
    .await?;

    Ok((room_id, host_id, guest_id))
}

/// Drive a joined room into `Playing` with the given secrets.
/// Returns the id of the player whose turn it is.
pub async fn start_game(
    state: &AppState,
    room_id: i64,
    host_id: i64,
    guest_id: i64,
    host_secret: &str,
    guest_secret: &str,
) -> Result<i64, AppError> {
    use backend::db::txn::with_txn;
    use backend::services::game_flow::GameFlowService;

    let host_secret = host_secret.to_string();
    let guest_secret = guest_secret.to_string();

    with_txn(None, state, |txn| {
        Box::pin(async move {
            let service = GameFlowService::new();
            service
                .submit_secret(txn, room_id, host_id, &host_secret)
                .await?;
            let outcome = service
                .submit_secret(txn, room_id, guest_id, &guest_secret)
                .await?;
            outcome
                .room
                .current_turn_player_id
                .ok_or_else(|| AppError::internal("started game has no turn".to_string()))
        })
    })
    .await
}
