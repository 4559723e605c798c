//! Room lifecycle routes.
//!
//! Mutating handlers share one shape: take the room's mutation lock, run
//! the game-flow service inside a transaction, then publish the outcome's
//! events. The lock is held across publication, so subscribers observe
//! events in exactly the order mutations were accepted.

use actix_web::http::header::{ETAG, IF_NONE_MATCH};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::domain::snapshot::{RoomSnapshot, RoundView};
use crate::error::AppError;
use crate::extractors::player_id::PlayerId;
use crate::extractors::room_id::RoomId;
use crate::http::etag::room_etag;
use crate::services::game_flow::{GameFlowService, RoomFlowOutcome};
use crate::services::stats::StatsService;
use crate::state::app_state::AppState;
use crate::repos::{rooms, rounds};

#[derive(Debug, Deserialize)]
struct CreateRoomRequest {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CodeRequest {
    code: String,
}

#[derive(Serialize)]
struct GuessResponse {
    room: RoomSnapshot,
    round: RoundView,
}

/// Publish the outcome's events to subscribers: `RoundAdded` first (when a
/// guess was recorded), then the `RoomChanged` snapshot.
///
/// The mutation is already committed; a publish failure after retries is
/// logged and the HTTP echo remains the authoritative confirmation.
async fn publish_outcome(app_state: &AppState, outcome: &RoomFlowOutcome) {
    let Some(broker) = app_state.broker() else {
        return;
    };

    if let Some(round) = &outcome.new_round {
        if let Err(err) = broker.publish_round_added(&round.view()).await {
            warn!(room_id = outcome.room.id, error = %err, "Failed to publish RoundAdded");
        }
    }
    if let Err(err) = broker.publish_room_changed(&outcome.room.snapshot()).await {
        warn!(room_id = outcome.room.id, error = %err, "Failed to publish RoomChanged");
    }
}

/// Post-commit effects shared by all mutations: events out, statistics
/// hand-off on completion, lock registry cleanup on cancellation.
async fn finish_mutation(app_state: &AppState, outcome: &RoomFlowOutcome) {
    publish_outcome(app_state, outcome).await;

    if let Some(winner_id) = outcome.completed_winner() {
        match (require_db(app_state), outcome.room.guest_id) {
            (Ok(db), Some(guest_id)) => {
                StatsService::spawn_record_finished(
                    db.clone(),
                    outcome.room.id,
                    outcome.room.instance_no,
                    outcome.room.host_id,
                    guest_id,
                    winner_id,
                );
            }
            _ => warn!(
                room_id = outcome.room.id,
                "Completed game missing db or guest; statistics skipped"
            ),
        }
    }

    if outcome.cancelled() {
        app_state.room_locks().release(outcome.room.id);
    }
}

/// POST /api/rooms
async fn create_room(
    http_req: HttpRequest,
    player_id: PlayerId,
    body: web::Json<CreateRoomRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let name = body.into_inner().name;

    // A room that does not exist yet cannot contend with anything; creation
    // is the one mutation that skips the room lock.
    let outcome = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            GameFlowService::new()
                .create_room(txn, player_id.0, &name)
                .await
        })
    })
    .await?;

    finish_mutation(&app_state, &outcome).await;

    Ok(HttpResponse::Created().json(outcome.room.snapshot()))
}

/// GET /api/rooms — lobby listing of joinable rooms.
async fn list_waiting_rooms(
    http_req: HttpRequest,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let snapshots = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let waiting = rooms::list_waiting(txn).await?;
            Ok::<_, AppError>(
                waiting
                    .iter()
                    .map(rooms::Room::snapshot)
                    .collect::<Vec<_>>(),
            )
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(snapshots))
}

/// GET /api/rooms/{room_id}/snapshot
///
/// Read-only view; runs without the room lock and may trail an in-flight
/// mutation by one event. Supports `If-None-Match` against the room ETag.
async fn get_snapshot(
    http_req: HttpRequest,
    room_id: RoomId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = room_id.0;

    let snapshot = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let room = rooms::require_room(txn, id).await?;
            Ok::<_, AppError>(room.snapshot())
        })
    })
    .await?;

    let etag_value = room_etag(id, snapshot.lock_version);

    if let Some(if_none_match) = http_req.headers().get(IF_NONE_MATCH) {
        if let Ok(client_etag) = if_none_match.to_str() {
            // Wildcard "*" means "any representation exists" (RFC 9110)
            let matches = client_etag.trim() == "*"
                || client_etag
                    .split(',')
                    .map(str::trim)
                    .any(|etag| etag == etag_value);

            if matches {
                return Ok(HttpResponse::build(StatusCode::NOT_MODIFIED)
                    .insert_header((ETAG, etag_value))
                    .finish());
            }
        }
    }

    Ok(HttpResponse::Ok()
        .insert_header((ETAG, etag_value))
        .json(snapshot))
}

/// GET /api/rooms/{room_id}/rounds — guess history of the current instance.
async fn get_rounds(
    http_req: HttpRequest,
    room_id: RoomId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = room_id.0;

    let views = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let room = rooms::require_room(txn, id).await?;
            let active = rounds::active_rounds(txn, room.id, room.instance_no).await?;
            Ok::<_, AppError>(active.iter().map(rounds::Round::view).collect::<Vec<_>>())
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(views))
}

/// POST /api/rooms/{room_id}/join
async fn join_room(
    http_req: HttpRequest,
    room_id: RoomId,
    player_id: PlayerId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = room_id.0;

    let _guard = app_state.room_locks().acquire(id).await;
    let outcome = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { GameFlowService::new().join_room(txn, id, player_id.0).await })
    })
    .await?;
    finish_mutation(&app_state, &outcome).await;

    Ok(HttpResponse::Ok().json(outcome.room.snapshot()))
}

/// POST /api/rooms/{room_id}/secret
async fn submit_secret(
    http_req: HttpRequest,
    room_id: RoomId,
    player_id: PlayerId,
    body: web::Json<CodeRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = room_id.0;
    let code = body.into_inner().code;

    let _guard = app_state.room_locks().acquire(id).await;
    let outcome = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            GameFlowService::new()
                .submit_secret(txn, id, player_id.0, &code)
                .await
        })
    })
    .await?;
    finish_mutation(&app_state, &outcome).await;

    Ok(HttpResponse::Ok().json(outcome.room.snapshot()))
}

/// POST /api/rooms/{room_id}/guess
async fn submit_guess(
    http_req: HttpRequest,
    room_id: RoomId,
    player_id: PlayerId,
    body: web::Json<CodeRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = room_id.0;
    let code = body.into_inner().code;

    let _guard = app_state.room_locks().acquire(id).await;
    let outcome = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            GameFlowService::new()
                .submit_guess(txn, id, player_id.0, &code)
                .await
        })
    })
    .await?;
    finish_mutation(&app_state, &outcome).await;

    let round = outcome
        .new_round
        .as_ref()
        .map(rounds::Round::view)
        .ok_or_else(|| AppError::internal("Accepted guess produced no round".to_string()))?;

    Ok(HttpResponse::Ok().json(GuessResponse {
        room: outcome.room.snapshot(),
        round,
    }))
}

/// POST /api/rooms/{room_id}/leave
async fn leave_room(
    http_req: HttpRequest,
    room_id: RoomId,
    player_id: PlayerId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = room_id.0;

    let _guard = app_state.room_locks().acquire(id).await;
    let outcome = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { GameFlowService::new().leave_room(txn, id, player_id.0).await })
    })
    .await?;
    finish_mutation(&app_state, &outcome).await;

    Ok(HttpResponse::Ok().json(outcome.room.snapshot()))
}

/// POST /api/rooms/{room_id}/restart
async fn restart_room(
    http_req: HttpRequest,
    room_id: RoomId,
    _player_id: PlayerId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = room_id.0;

    let _guard = app_state.room_locks().acquire(id).await;
    let outcome = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { GameFlowService::new().restart_room(txn, id).await })
    })
    .await?;
    finish_mutation(&app_state, &outcome).await;

    Ok(HttpResponse::Ok().json(outcome.room.snapshot()))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::post().to(create_room))
            .route(web::get().to(list_waiting_rooms)),
    );
    cfg.service(web::resource("/{room_id}/snapshot").route(web::get().to(get_snapshot)));
    cfg.service(web::resource("/{room_id}/rounds").route(web::get().to(get_rounds)));
    cfg.service(web::resource("/{room_id}/join").route(web::post().to(join_room)));
    cfg.service(web::resource("/{room_id}/secret").route(web::post().to(submit_secret)));
    cfg.service(web::resource("/{room_id}/guess").route(web::post().to(submit_guess)));
    cfg.service(web::resource("/{room_id}/leave").route(web::post().to(leave_room)));
    cfg.service(web::resource("/{room_id}/restart").route(web::post().to(restart_room)));
}
