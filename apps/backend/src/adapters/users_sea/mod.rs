//! SeaORM adapter for the users table.
//!
//! The engine treats identity as opaque; this adapter exists for display
//! metadata and for the statistics counters the aggregator maintains.

use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::entities::users;

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    users::Entity::find_by_id(user_id).one(conn).await
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    username: String,
) -> Result<users::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let user = users::ActiveModel {
        id: sea_orm::NotSet,
        username: Set(username),
        total_games: Set(0),
        wins: Set(0),
        total_rounds: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    };
    user.insert(conn).await
}

/// Fold one finished game into a player's counters.
///
/// Increments are expressed column-relative so concurrent finishes from
/// different rooms cannot lose updates.
pub async fn record_game_result<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    won: bool,
    rounds_played: i32,
) -> Result<(), sea_orm::DbErr> {
    use sea_orm::sea_query::Expr;

    let now = time::OffsetDateTime::now_utc();

    let mut update = users::Entity::update_many()
        .col_expr(
            users::Column::TotalGames,
            Expr::col(users::Column::TotalGames).add(1),
        )
        .col_expr(
            users::Column::TotalRounds,
            Expr::col(users::Column::TotalRounds).add(rounds_played),
        )
        .col_expr(users::Column::UpdatedAt, Expr::val(now).into());

    if won {
        update = update.col_expr(users::Column::Wins, Expr::col(users::Column::Wins).add(1));
    }

    update
        .filter(users::Column::Id.eq(user_id))
        .exec(conn)
        .await?;

    Ok(())
}
