mod support;

use backend::db::txn::with_txn;
use backend::entities::rooms::RoomStatus;
use backend::error::AppError;
use backend::errors::ErrorCode;
use backend::repos::rooms;
use backend::services::game_flow::GameFlowService;

use support::{build_test_state, seed_user};

#[tokio::test]
async fn create_room_starts_waiting() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let host_id = seed_user(&state, "host").await?;

    let outcome = with_txn(None, &state, |txn| {
        Box::pin(async move { GameFlowService::new().create_room(txn, host_id, "my room").await })
    })
    .await?;

    assert_eq!(outcome.room.status, RoomStatus::Waiting);
    assert_eq!(outcome.room.host_id, host_id);
    assert_eq!(outcome.room.guest_id, None);
    assert_eq!(outcome.room.instance_no, 1);
    assert!(outcome.room.current_turn_player_id.is_none());
    assert!(outcome.room.winner_id.is_none());
    assert!(outcome.transitions.is_empty());

    Ok(())
}

#[tokio::test]
async fn create_room_rejects_blank_name() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let host_id = seed_user(&state, "host").await?;

    let err = with_txn(None, &state, |txn| {
        Box::pin(async move { GameFlowService::new().create_room(txn, host_id, "   ").await })
    })
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        AppError::Validation {
            code: ErrorCode::InvalidInput,
            ..
        }
    ));

    Ok(())
}

#[tokio::test]
async fn join_moves_room_to_preparing() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let host_id = seed_user(&state, "host").await?;
    let guest_id = seed_user(&state, "guest").await?;

    let room = with_txn(None, &state, |txn| {
        Box::pin(async move {
            let service = GameFlowService::new();
            let created = service.create_room(txn, host_id, "my room").await?;
            let joined = service.join_room(txn, created.room.id, guest_id).await?;
            Ok::<_, AppError>(joined.room)
        })
    })
    .await?;

    assert_eq!(room.status, RoomStatus::Preparing);
    assert_eq!(room.guest_id, Some(guest_id));

    Ok(())
}

#[tokio::test]
async fn third_player_join_is_room_full() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let host_id = seed_user(&state, "host").await?;
    let guest_id = seed_user(&state, "guest").await?;
    let third_id = seed_user(&state, "third").await?;

    let room_id = with_txn(None, &state, |txn| {
        Box::pin(async move {
            let service = GameFlowService::new();
            let created = service.create_room(txn, host_id, "my room").await?;
            service.join_room(txn, created.room.id, guest_id).await?;
            Ok::<_, AppError>(created.room.id)
        })
    })
    .await?;

    let err = with_txn(None, &state, |txn| {
        Box::pin(async move { GameFlowService::new().join_room(txn, room_id, third_id).await })
    })
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        AppError::Conflict {
            code: ErrorCode::RoomFull,
            ..
        }
    ));

    // State unchanged: original guest still seated
    let room = with_txn(None, &state, |txn| {
        Box::pin(async move { Ok::<_, AppError>(rooms::require_room(txn, room_id).await?) })
    })
    .await?;
    assert_eq!(room.guest_id, Some(guest_id));
    assert_eq!(room.status, RoomStatus::Preparing);

    Ok(())
}

#[tokio::test]
async fn host_cannot_join_own_room() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let host_id = seed_user(&state, "host").await?;

    let err = with_txn(None, &state, |txn| {
        Box::pin(async move {
            let service = GameFlowService::new();
            let created = service.create_room(txn, host_id, "my room").await?;
            service.join_room(txn, created.room.id, host_id).await
        })
    })
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        AppError::Validation {
            code: ErrorCode::InvalidInput,
            ..
        }
    ));

    Ok(())
}

#[tokio::test]
async fn join_missing_room_is_not_found() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let guest_id = seed_user(&state, "guest").await?;

    let err = with_txn(None, &state, |txn| {
        Box::pin(async move { GameFlowService::new().join_room(txn, 999_999, guest_id).await })
    })
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        AppError::NotFound {
            code: ErrorCode::RoomNotFound,
            ..
        }
    ));

    Ok(())
}

#[tokio::test]
async fn both_secrets_start_the_game_with_a_turn() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let (room_id, host_id, guest_id) = support::seed_joined_room(&state).await?;

    let first_turn =
        support::start_game(&state, room_id, host_id, guest_id, "1234", "5678").await?;

    let room = with_txn(None, &state, |txn| {
        Box::pin(async move { Ok::<_, AppError>(rooms::require_room(txn, room_id).await?) })
    })
    .await?;

    assert_eq!(room.status, RoomStatus::Playing);
    assert!(first_turn == host_id || first_turn == guest_id);
    assert_eq!(room.current_turn_player_id, Some(first_turn));
    assert!(room.winner_id.is_none());

    Ok(())
}

#[tokio::test]
async fn second_secret_from_same_player_is_rejected() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let (room_id, host_id, _guest_id) = support::seed_joined_room(&state).await?;

    let err = with_txn(None, &state, |txn| {
        Box::pin(async move {
            let service = GameFlowService::new();
            service.submit_secret(txn, room_id, host_id, "1234").await?;
            service.submit_secret(txn, room_id, host_id, "9999").await
        })
    })
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        AppError::Conflict {
            code: ErrorCode::SecretAlreadySubmitted,
            ..
        }
    ));

    Ok(())
}

#[tokio::test]
async fn secret_requires_four_digits() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let (room_id, host_id, _guest_id) = support::seed_joined_room(&state).await?;

    for bad in ["123", "12345", "abcd", "12 4", ""] {
        let err = with_txn(None, &state, |txn| {
            Box::pin(async move {
                GameFlowService::new()
                    .submit_secret(txn, room_id, host_id, bad)
                    .await
            })
        })
        .await
        .unwrap_err();

        assert!(
            matches!(
                err,
                AppError::Validation {
                    code: ErrorCode::InvalidGuessFormat,
                    ..
                }
            ),
            "expected InvalidGuessFormat for {bad:?}"
        );
    }

    Ok(())
}

#[tokio::test]
async fn secret_from_stranger_is_rejected() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let (room_id, _host_id, _guest_id) = support::seed_joined_room(&state).await?;
    let stranger = seed_user(&state, "stranger").await?;

    let err = with_txn(None, &state, |txn| {
        Box::pin(async move {
            GameFlowService::new()
                .submit_secret(txn, room_id, stranger, "1234")
                .await
        })
    })
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        AppError::Validation {
            code: ErrorCode::PlayerNotInGame,
            ..
        }
    ));

    Ok(())
}
