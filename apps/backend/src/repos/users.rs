//! User repository functions for the domain layer.

use sea_orm::ConnectionTrait;

use crate::adapters::users_sea;
use crate::entities::users;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::infra::db_errors::map_db_err;

/// User domain model (identity + statistics counters).
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub total_games: i32,
    pub wins: i32,
    pub total_rounds: i32,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            total_games: model.total_games,
            wins: model.wins,
            total_rounds: model.total_rounds,
        }
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<User>, DomainError> {
    let user = users_sea::find_by_id(conn, user_id)
        .await
        .map_err(map_db_err)?;
    Ok(user.map(User::from))
}

pub async fn require_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<User, DomainError> {
    find_by_id(conn, user_id)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::User, format!("User {user_id} not found")))
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    username: String,
) -> Result<User, DomainError> {
    let user = users_sea::create_user(conn, username)
        .await
        .map_err(map_db_err)?;
    Ok(User::from(user))
}

/// Fold one finished game into a player's counters.
pub async fn record_game_result<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    won: bool,
    rounds_played: i32,
) -> Result<(), DomainError> {
    users_sea::record_game_result(conn, user_id, won, rounds_played)
        .await
        .map_err(map_db_err)
}
