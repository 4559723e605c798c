use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind};
use crate::errors::ErrorCode;
use crate::trace_ctx;

#[derive(Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation {
        code: ErrorCode,
        detail: String,
        status: StatusCode,
    },
    #[error("Database error: {detail}")]
    Db { detail: String },
    #[error("Not found: {detail}")]
    NotFound { code: ErrorCode, detail: String },
    #[error("Bad request: {detail}")]
    BadRequest { code: ErrorCode, detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Conflict: {detail}")]
    Conflict { code: ErrorCode, detail: String },
    #[error("Storage unavailable: {detail}")]
    StorageUnavailable { detail: String },
}

impl AppError {
    /// Helper method to extract error code from any error variant
    fn code(&self) -> String {
        match self {
            AppError::Validation { code, .. } => code.to_string(),
            AppError::Db { .. } => ErrorCode::DbError.to_string(),
            AppError::NotFound { code, .. } => code.to_string(),
            AppError::BadRequest { code, .. } => code.to_string(),
            AppError::Internal { .. } => ErrorCode::Internal.to_string(),
            AppError::Config { .. } => ErrorCode::ConfigError.to_string(),
            AppError::Conflict { code, .. } => code.to_string(),
            AppError::StorageUnavailable { .. } => ErrorCode::StorageUnavailable.to_string(),
        }
    }

    /// Helper method to extract error detail from any error variant
    fn detail(&self) -> String {
        match self {
            AppError::Validation { detail, .. } => detail.clone(),
            AppError::Db { detail, .. } => detail.clone(),
            AppError::NotFound { detail, .. } => detail.clone(),
            AppError::BadRequest { detail, .. } => detail.clone(),
            AppError::Internal { detail, .. } => detail.clone(),
            AppError::Config { detail, .. } => detail.clone(),
            AppError::Conflict { detail, .. } => detail.clone(),
            AppError::StorageUnavailable { detail, .. } => detail.clone(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { status, .. } => *status,
            AppError::Db { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::StorageUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn invalid(code: ErrorCode, detail: String) -> Self {
        Self::Validation {
            code,
            detail,
            status: StatusCode::BAD_REQUEST,
        }
    }

    pub fn invalid_with_status(code: ErrorCode, detail: String, status: StatusCode) -> Self {
        Self::Validation {
            code,
            detail,
            status,
        }
    }

    pub fn internal(detail: String) -> Self {
        Self::Internal { detail }
    }

    pub fn bad_request(code: ErrorCode, detail: String) -> Self {
        Self::BadRequest { code, detail }
    }

    pub fn not_found(code: ErrorCode, detail: String) -> Self {
        Self::NotFound { code, detail }
    }

    pub fn db(detail: String) -> Self {
        Self::Db { detail }
    }

    pub fn config(detail: String) -> Self {
        Self::Config { detail }
    }

    pub fn conflict(code: ErrorCode, detail: String) -> Self {
        Self::Conflict { code, detail }
    }

    pub fn storage_unavailable(detail: String) -> Self {
        Self::StorageUnavailable { detail }
    }

    fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<std::env::VarError> for AppError {
    fn from(e: std::env::VarError) -> Self {
        AppError::internal(format!("env var error: {e}"))
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(e: sea_orm::DbErr) -> Self {
        AppError::from(crate::infra::db_errors::map_db_err(e))
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(kind, detail) => match kind {
                ValidationKind::InvalidInput => AppError::invalid(ErrorCode::InvalidInput, detail),
                ValidationKind::InvalidGuessFormat => {
                    AppError::invalid(ErrorCode::InvalidGuessFormat, detail)
                }
                // Status-machine violations are conflicts with current state,
                // not malformed requests.
                ValidationKind::PhaseMismatch => AppError::invalid_with_status(
                    ErrorCode::GameNotInPlayableState,
                    detail,
                    StatusCode::CONFLICT,
                ),
                ValidationKind::OutOfTurn => AppError::invalid_with_status(
                    ErrorCode::NotYourTurn,
                    detail,
                    StatusCode::CONFLICT,
                ),
                ValidationKind::NotInRoom => AppError::invalid_with_status(
                    ErrorCode::PlayerNotInGame,
                    detail,
                    StatusCode::FORBIDDEN,
                ),
                ValidationKind::Other(_) => AppError::invalid(ErrorCode::ValidationError, detail),
            },
            DomainError::Conflict(kind, detail) => match kind {
                ConflictKind::RoomFull => AppError::conflict(ErrorCode::RoomFull, detail),
                ConflictKind::SecretAlreadySubmitted => {
                    AppError::conflict(ErrorCode::SecretAlreadySubmitted, detail)
                }
                ConflictKind::OptimisticLock => {
                    AppError::conflict(ErrorCode::ConcurrentModification, detail)
                }
                ConflictKind::UniqueUsername => {
                    AppError::conflict(ErrorCode::UniqueUsername, detail)
                }
                ConflictKind::Other(_) => AppError::conflict(ErrorCode::Conflict, detail),
            },
            DomainError::NotFound(kind, detail) => match kind {
                NotFoundKind::Room => AppError::not_found(ErrorCode::RoomNotFound, detail),
                NotFoundKind::User => AppError::not_found(ErrorCode::UserNotFound, detail),
                NotFoundKind::Other(_) => AppError::not_found(ErrorCode::NotFound, detail),
            },
            DomainError::Infra(kind, detail) => match kind {
                InfraErrorKind::Timeout | InfraErrorKind::DbUnavailable => {
                    AppError::storage_unavailable(detail)
                }
                InfraErrorKind::DataCorruption => AppError::internal(detail),
                InfraErrorKind::Other(_) => AppError::db(detail),
            },
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let code = self.code();
        let detail = self.detail();
        let trace_id = trace_ctx::trace_id();

        let problem_details = ProblemDetails {
            type_: format!("https://codebreak.app/errors/{}", code.to_uppercase()),
            title: Self::humanize_code(&code),
            status: status.as_u16(),
            detail,
            code,
            trace_id: trace_id.clone(),
        };

        HttpResponse::build(status)
            .content_type("application/problem+json")
            .insert_header(("x-trace-id", trace_id))
            .json(problem_details)
    }
}
