use actix_web::http::StatusCode;

use crate::error::AppError;
use crate::errors::domain::{
    ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::errors::ErrorCode;

fn assert_maps(domain: DomainError, expected_code: ErrorCode, expected_status: StatusCode) {
    let app: AppError = domain.into();
    assert_eq!(app.status(), expected_status);
    match app {
        AppError::Validation { code, .. }
        | AppError::NotFound { code, .. }
        | AppError::BadRequest { code, .. }
        | AppError::Conflict { code, .. } => assert_eq!(code, expected_code),
        other => panic!("unexpected AppError variant for {expected_code}: {other:?}"),
    }
}

#[test]
fn validation_kinds_map_to_engine_codes() {
    assert_maps(
        DomainError::validation(ValidationKind::InvalidInput, "x"),
        ErrorCode::InvalidInput,
        StatusCode::BAD_REQUEST,
    );
    assert_maps(
        DomainError::validation(ValidationKind::InvalidGuessFormat, "x"),
        ErrorCode::InvalidGuessFormat,
        StatusCode::BAD_REQUEST,
    );
    assert_maps(
        DomainError::validation(ValidationKind::PhaseMismatch, "x"),
        ErrorCode::GameNotInPlayableState,
        StatusCode::CONFLICT,
    );
    assert_maps(
        DomainError::validation(ValidationKind::OutOfTurn, "x"),
        ErrorCode::NotYourTurn,
        StatusCode::CONFLICT,
    );
    assert_maps(
        DomainError::validation(ValidationKind::NotInRoom, "x"),
        ErrorCode::PlayerNotInGame,
        StatusCode::FORBIDDEN,
    );
}

#[test]
fn conflict_kinds_map_to_engine_codes() {
    assert_maps(
        DomainError::conflict(ConflictKind::RoomFull, "x"),
        ErrorCode::RoomFull,
        StatusCode::CONFLICT,
    );
    assert_maps(
        DomainError::conflict(ConflictKind::SecretAlreadySubmitted, "x"),
        ErrorCode::SecretAlreadySubmitted,
        StatusCode::CONFLICT,
    );
    assert_maps(
        DomainError::conflict(ConflictKind::OptimisticLock, "x"),
        ErrorCode::ConcurrentModification,
        StatusCode::CONFLICT,
    );
}

#[test]
fn not_found_kinds_map_to_engine_codes() {
    assert_maps(
        DomainError::not_found(NotFoundKind::Room, "x"),
        ErrorCode::RoomNotFound,
        StatusCode::NOT_FOUND,
    );
    assert_maps(
        DomainError::not_found(NotFoundKind::User, "x"),
        ErrorCode::UserNotFound,
        StatusCode::NOT_FOUND,
    );
}

#[test]
fn infra_failures_surface_as_storage_unavailable() {
    for kind in [InfraErrorKind::DbUnavailable, InfraErrorKind::Timeout] {
        let app: AppError = DomainError::infra(kind, "x").into();
        assert_eq!(app.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(matches!(app, AppError::StorageUnavailable { .. }));
    }
}
