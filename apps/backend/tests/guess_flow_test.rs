mod support;

use backend::db::txn::with_txn;
use backend::entities::rooms::RoomStatus;
use backend::error::AppError;
use backend::errors::ErrorCode;
use backend::repos::rooms;
use backend::services::game_flow::GameFlowService;

use support::{build_test_state, seed_joined_room, seed_user, start_game};

async fn guess(
    state: &backend::AppState,
    room_id: i64,
    player_id: i64,
    code: &'static str,
) -> Result<backend::services::game_flow::RoomFlowOutcome, AppError> {
    with_txn(None, state, |txn| {
        Box::pin(async move {
            GameFlowService::new()
                .submit_guess(txn, room_id, player_id, code)
                .await
        })
    })
    .await
}

/// Winning guess completes the game with the guesser as winner.
#[tokio::test]
async fn cracking_the_code_completes_the_game() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let (room_id, host_id, guest_id) = seed_joined_room(&state).await?;

    // host secret 1234, guest secret 5678
    let first = start_game(&state, room_id, host_id, guest_id, "1234", "5678").await?;

    // If the host drew the first turn, burn it with a miss so the guest can
    // play the winning guess against the host's secret.
    if first == host_id {
        let outcome = guess(&state, room_id, host_id, "0000").await?;
        assert_eq!(outcome.new_round.as_ref().unwrap().match_count, 0);
    }

    let outcome = guess(&state, room_id, guest_id, "1234").await?;
    let round = outcome.new_round.as_ref().unwrap();

    assert_eq!(round.match_count, 4);
    assert_eq!(outcome.room.status, RoomStatus::Completed);
    assert_eq!(outcome.room.winner_id, Some(guest_id));
    assert_eq!(outcome.room.current_turn_player_id, None);
    assert_eq!(outcome.completed_winner(), Some(guest_id));

    Ok(())
}

/// A miss keeps the game going and flips the turn to the opponent.
#[tokio::test]
async fn missed_guess_flips_the_turn() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let (room_id, host_id, guest_id) = seed_joined_room(&state).await?;

    let first = start_game(&state, room_id, host_id, guest_id, "1234", "5678").await?;
    let second = if first == host_id { guest_id } else { host_id };

    // No digit of 9090 appears at the same position in either secret.
    let outcome = guess(&state, room_id, first, "9090").await?;

    assert_eq!(outcome.new_round.as_ref().unwrap().match_count, 0);
    assert_eq!(outcome.room.status, RoomStatus::Playing);
    assert_eq!(outcome.room.current_turn_player_id, Some(second));
    assert!(outcome.room.winner_id.is_none());

    Ok(())
}

/// The server-side turn gate: a player cannot move out of turn, and the
/// rejection leaves the room untouched.
#[tokio::test]
async fn out_of_turn_guess_is_rejected() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let (room_id, host_id, guest_id) = seed_joined_room(&state).await?;

    let first = start_game(&state, room_id, host_id, guest_id, "1234", "5678").await?;
    let waiting_player = if first == host_id { guest_id } else { host_id };

    let before = with_txn(None, &state, |txn| {
        Box::pin(async move { Ok::<_, AppError>(rooms::require_room(txn, room_id).await?) })
    })
    .await?;

    let err = guess(&state, room_id, waiting_player, "1111")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation {
            code: ErrorCode::NotYourTurn,
            ..
        }
    ));

    let after = with_txn(None, &state, |txn| {
        Box::pin(async move { Ok::<_, AppError>(rooms::require_room(txn, room_id).await?) })
    })
    .await?;

    assert_eq!(before, after, "rejected guess must not change state");

    Ok(())
}

#[tokio::test]
async fn turn_strictly_alternates_while_playing() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let (room_id, host_id, guest_id) = seed_joined_room(&state).await?;

    let mut turn = start_game(&state, room_id, host_id, guest_id, "1234", "5678").await?;

    for _ in 0..6 {
        let outcome = guess(&state, room_id, turn, "9090").await?;
        let next = outcome.room.current_turn_player_id.unwrap();
        assert_ne!(next, turn, "turn must never repeat for the same player");
        turn = next;
    }

    Ok(())
}

#[tokio::test]
async fn guess_requires_playing_state() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let (room_id, host_id, _guest_id) = seed_joined_room(&state).await?;

    // Still Preparing: nobody has submitted secrets
    let err = guess(&state, room_id, host_id, "1234").await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation {
            code: ErrorCode::GameNotInPlayableState,
            ..
        }
    ));

    Ok(())
}

#[tokio::test]
async fn malformed_guess_is_rejected_before_any_other_check() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let (room_id, host_id, guest_id) = seed_joined_room(&state).await?;
    start_game(&state, room_id, host_id, guest_id, "1234", "5678").await?;

    // Even out of turn, the format error wins: validation is step 1.
    for player in [host_id, guest_id] {
        let err = guess(&state, room_id, player, "12x4").await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation {
                code: ErrorCode::InvalidGuessFormat,
                ..
            }
        ));
    }

    Ok(())
}

#[tokio::test]
async fn stranger_cannot_guess() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let (room_id, host_id, guest_id) = seed_joined_room(&state).await?;
    start_game(&state, room_id, host_id, guest_id, "1234", "5678").await?;
    let stranger = seed_user(&state, "stranger").await?;

    let err = guess(&state, room_id, stranger, "1234").await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation {
            code: ErrorCode::PlayerNotInGame,
            ..
        }
    ));

    Ok(())
}

/// Completion is terminal for the instance: no further guesses.
#[tokio::test]
async fn completed_game_accepts_no_more_guesses() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let (room_id, host_id, guest_id) = seed_joined_room(&state).await?;

    let first = start_game(&state, room_id, host_id, guest_id, "1234", "5678").await?;
    let second = if first == host_id { guest_id } else { host_id };
    let winning = if first == host_id { "5678" } else { "1234" };

    let outcome = guess(&state, room_id, first, winning).await?;
    assert_eq!(outcome.room.status, RoomStatus::Completed);
    assert_eq!(outcome.room.winner_id, Some(first));

    let err = guess(&state, room_id, second, "1234").await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation {
            code: ErrorCode::GameNotInPlayableState,
            ..
        }
    ));

    Ok(())
}
