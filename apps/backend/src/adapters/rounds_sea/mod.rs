//! SeaORM adapter for the rounds ledger.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::game_rounds;

pub mod dto;

pub use dto::RoundCreate;

/// Insert one guess row.
pub async fn create_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: RoundCreate,
) -> Result<game_rounds::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();

    let round = game_rounds::ActiveModel {
        id: sea_orm::NotSet,
        room_id: Set(dto.room_id),
        instance_no: Set(dto.instance_no),
        player_id: Set(dto.player_id),
        guess_digits: Set(dto.guess_digits),
        match_count: Set(dto.match_count),
        round_number: Set(dto.round_number),
        created_at: Set(now),
    };

    round.insert(conn).await
}

/// All rounds of one instance, in insertion order.
pub async fn find_by_room_and_instance<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    instance_no: i32,
) -> Result<Vec<game_rounds::Model>, sea_orm::DbErr> {
    game_rounds::Entity::find()
        .filter(game_rounds::Column::RoomId.eq(room_id))
        .filter(game_rounds::Column::InstanceNo.eq(instance_no))
        .order_by_asc(game_rounds::Column::Id)
        .all(conn)
        .await
}

/// Number of guesses recorded for one instance.
pub async fn count_by_room_and_instance<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    instance_no: i32,
) -> Result<u64, sea_orm::DbErr> {
    game_rounds::Entity::find()
        .filter(game_rounds::Column::RoomId.eq(room_id))
        .filter(game_rounds::Column::InstanceNo.eq(instance_no))
        .count(conn)
        .await
}

/// Number of guesses one player made in one instance.
pub async fn count_by_player_in_instance<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    instance_no: i32,
    player_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    game_rounds::Entity::find()
        .filter(game_rounds::Column::RoomId.eq(room_id))
        .filter(game_rounds::Column::InstanceNo.eq(instance_no))
        .filter(game_rounds::Column::PlayerId.eq(player_id))
        .count(conn)
        .await
}

/// Bulk-delete one instance's rounds. Returns the number of rows removed.
pub async fn delete_by_room_and_instance<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    instance_no: i32,
) -> Result<u64, sea_orm::DbErr> {
    let result = game_rounds::Entity::delete_many()
        .filter(game_rounds::Column::RoomId.eq(room_id))
        .filter(game_rounds::Column::InstanceNo.eq(instance_no))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}
