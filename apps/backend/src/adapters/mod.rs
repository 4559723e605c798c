//! SeaORM adapters. Functions here return `sea_orm::DbErr`; the repos layer
//! maps to `DomainError` via `infra::db_errors::map_db_err`.

pub mod rooms_sea;
pub mod rounds_sea;
pub mod users_sea;
