mod support;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use backend::error::AppError;
use backend::middleware::request_trace::RequestTrace;
use backend::routes;
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use serde_json::json;

use support::{build_test_state, seed_joined_room, seed_user};

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .wrap(RequestTrace)
                .app_data(web::Data::new($state.clone()))
                .service(web::scope("/api/rooms").configure(routes::rooms::configure_routes))
                .configure(routes::configure),
        )
        .await
    };
}

#[tokio::test]
async fn unknown_room_is_problem_json_not_found() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = test_app!(state);

    let req = test::TestRequest::get()
        .uri("/api/rooms/424242/snapshot")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details_from_service_response(
        resp,
        "ROOM_NOT_FOUND",
        StatusCode::NOT_FOUND,
        Some("424242"),
    )
    .await;

    Ok(())
}

#[tokio::test]
async fn missing_player_header_is_problem_json() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/rooms")
        .set_json(json!({"name": "a room"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details_from_service_response(
        resp,
        "INVALID_HEADER",
        StatusCode::BAD_REQUEST,
        Some("x-player-id"),
    )
    .await;

    Ok(())
}

#[tokio::test]
async fn join_full_room_is_problem_json_conflict() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let (room_id, _host_id, _guest_id) = seed_joined_room(&state).await?;
    let third = seed_user(&state, "third").await?;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri(&format!("/api/rooms/{room_id}/join"))
        .insert_header(("x-player-id", third.to_string()))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details_from_service_response(resp, "ROOM_FULL", StatusCode::CONFLICT, None)
        .await;

    Ok(())
}

#[tokio::test]
async fn malformed_secret_is_problem_json() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let (room_id, host_id, _guest_id) = seed_joined_room(&state).await?;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri(&format!("/api/rooms/{room_id}/secret"))
        .insert_header(("x-player-id", host_id.to_string()))
        .set_json(json!({"code": "12ab"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details_from_service_response(
        resp,
        "INVALID_GUESS_FORMAT",
        StatusCode::BAD_REQUEST,
        None,
    )
    .await;

    Ok(())
}
