mod support;

use backend::db::txn::with_txn;
use backend::entities::rooms::RoomStatus;
use backend::error::AppError;
use backend::errors::ErrorCode;
use backend::repos::{rooms, rounds};
use backend::services::game_flow::GameFlowService;

use support::{build_test_state, seed_joined_room, seed_user, start_game};

async fn leave(
    state: &backend::AppState,
    room_id: i64,
    player_id: i64,
) -> Result<backend::services::game_flow::RoomFlowOutcome, AppError> {
    with_txn(None, state, |txn| {
        Box::pin(async move {
            GameFlowService::new()
                .leave_room(txn, room_id, player_id)
                .await
        })
    })
    .await
}

/// Guest departure mid-game reverts the room to Waiting with the instance
/// wiped; the host keeps the seat.
#[tokio::test]
async fn guest_leaving_reverts_room_to_waiting() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let (room_id, host_id, guest_id) = seed_joined_room(&state).await?;
    let first = start_game(&state, room_id, host_id, guest_id, "1234", "5678").await?;

    // Put one round on the books so the purge is observable.
    with_txn(None, &state, |txn| {
        Box::pin(async move {
            GameFlowService::new()
                .submit_guess(txn, room_id, first, "9090")
                .await
        })
    })
    .await?;

    let outcome = leave(&state, room_id, guest_id).await?;
    let room = &outcome.room;

    assert_eq!(room.status, RoomStatus::Waiting);
    assert_eq!(room.host_id, host_id);
    assert_eq!(room.guest_id, None);
    assert_eq!(room.host_secret, None);
    assert_eq!(room.guest_secret, None);
    assert_eq!(room.current_turn_player_id, None);
    assert_eq!(room.winner_id, None);

    let active = with_txn(None, &state, |txn| {
        Box::pin(async move {
            let room = rooms::require_room(txn, room_id).await?;
            Ok::<_, AppError>(rounds::active_rounds(txn, room_id, room.instance_no).await?)
        })
    })
    .await?;
    assert!(active.is_empty(), "instance rounds must be purged");

    Ok(())
}

/// Host departure cancels the room no matter the status.
#[tokio::test]
async fn host_leaving_cancels_the_room() -> Result<(), AppError> {
    let state = build_test_state().await?;

    for phase in ["waiting", "preparing", "playing"] {
        let host_id = seed_user(&state, "host").await?;

        let room_id = match phase {
            "waiting" => {
                with_txn(None, &state, |txn| {
                    Box::pin(async move {
                        let created = GameFlowService::new()
                            .create_room(txn, host_id, "solo room")
                            .await?;
                        Ok::<_, AppError>(created.room.id)
                    })
                })
                .await?
            }
            _ => {
                let (room_id, h, g) = seed_joined_room(&state).await?;
                if phase == "playing" {
                    start_game(&state, room_id, h, g, "1234", "5678").await?;
                }
                // Leave as the actual host of the seeded room
                let outcome = leave(&state, room_id, h).await?;
                assert_eq!(outcome.room.status, RoomStatus::Cancelled);
                continue;
            }
        };

        let outcome = leave(&state, room_id, host_id).await?;
        assert_eq!(outcome.room.status, RoomStatus::Cancelled);
        assert_eq!(outcome.room.guest_id, None);
    }

    Ok(())
}

/// Leaving an already-cancelled room is a no-op for the former host.
#[tokio::test]
async fn repeated_host_leave_is_a_noop() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let (room_id, host_id, _guest_id) = seed_joined_room(&state).await?;

    let first = leave(&state, room_id, host_id).await?;
    assert_eq!(first.room.status, RoomStatus::Cancelled);
    assert!(first.cancelled());

    let second = leave(&state, room_id, host_id).await?;
    assert_eq!(second.room.status, RoomStatus::Cancelled);
    assert!(second.transitions.is_empty());
    assert_eq!(second.room.lock_version, first.room.lock_version);

    Ok(())
}

#[tokio::test]
async fn stranger_leave_is_rejected() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let (room_id, _host_id, _guest_id) = seed_joined_room(&state).await?;
    let stranger = seed_user(&state, "stranger").await?;

    let err = leave(&state, room_id, stranger).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation {
            code: ErrorCode::PlayerNotInGame,
            ..
        }
    ));

    Ok(())
}

/// Restart is only legal from Completed.
#[tokio::test]
async fn restart_requires_completed_game() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let (room_id, host_id, guest_id) = seed_joined_room(&state).await?;
    start_game(&state, room_id, host_id, guest_id, "1234", "5678").await?;

    let err = with_txn(None, &state, |txn| {
        Box::pin(async move { GameFlowService::new().restart_room(txn, room_id).await })
    })
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        AppError::Validation {
            code: ErrorCode::GameNotInPlayableState,
            ..
        }
    ));

    Ok(())
}

/// Restart opens a fresh instance: same players, cleared secrets, round
/// numbering back at 1, prior rounds invisible.
#[tokio::test]
async fn restart_resets_instance_and_round_numbering() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let (room_id, host_id, guest_id) = seed_joined_room(&state).await?;

    let first = start_game(&state, room_id, host_id, guest_id, "1234", "5678").await?;
    let winning = if first == host_id { "5678" } else { "1234" };

    let completed = with_txn(None, &state, |txn| {
        Box::pin(async move {
            GameFlowService::new()
                .submit_guess(txn, room_id, first, winning)
                .await
        })
    })
    .await?;
    assert_eq!(completed.room.status, RoomStatus::Completed);
    let old_instance = completed.room.instance_no;

    let restarted = with_txn(None, &state, |txn| {
        Box::pin(async move { GameFlowService::new().restart_room(txn, room_id).await })
    })
    .await?;
    let room = &restarted.room;

    assert_eq!(room.status, RoomStatus::Preparing);
    assert_eq!(room.instance_no, old_instance + 1);
    assert_eq!(room.host_id, host_id);
    assert_eq!(room.guest_id, Some(guest_id));
    assert_eq!(room.host_secret, None);
    assert_eq!(room.guest_secret, None);
    assert_eq!(room.winner_id, None);
    assert_eq!(room.current_turn_player_id, None);

    let active = with_txn(None, &state, |txn| {
        Box::pin(async move {
            Ok::<_, AppError>(rounds::active_rounds(txn, room_id, old_instance + 1).await?)
        })
    })
    .await?;
    assert!(active.is_empty());

    // New instance numbers from 1 again.
    let second_first =
        start_game(&state, room_id, host_id, guest_id, "1111", "2222").await?;
    let outcome = with_txn(None, &state, |txn| {
        Box::pin(async move {
            GameFlowService::new()
                .submit_guess(txn, room_id, second_first, "9090")
                .await
        })
    })
    .await?;
    assert_eq!(outcome.new_round.unwrap().round_number, 1);

    Ok(())
}
