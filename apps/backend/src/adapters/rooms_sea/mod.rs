//! SeaORM adapter for the rooms repository - generic over ConnectionTrait.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::rooms;
use crate::entities::rooms::RoomStatus;

pub mod dto;

pub use dto::{RoomCreate, RoomUpdate};

/// Helper: Apply optimistic update with lock version check, then refetch.
///
/// This consolidates the repetitive pattern:
/// - Adds lock_version increment and updated_at to the update
/// - Filters by id and current lock_version
/// - Checks rows_affected to distinguish NotFound vs OptimisticLock
/// - Refetches and returns the updated model
///
/// The caller provides a closure that configures entity-specific columns.
async fn optimistic_update_then_fetch<C, F>(
    conn: &C,
    id: i64,
    expected_version: i32,
    configure_update: F,
) -> Result<rooms::Model, sea_orm::DbErr>
where
    C: ConnectionTrait + Send + Sync,
    F: FnOnce(sea_orm::UpdateMany<rooms::Entity>) -> sea_orm::UpdateMany<rooms::Entity>,
{
    use sea_orm::sea_query::Expr;

    let now = time::OffsetDateTime::now_utc();

    let result = configure_update(rooms::Entity::update_many())
        .col_expr(rooms::Column::UpdatedAt, Expr::val(now).into())
        .col_expr(
            rooms::Column::LockVersion,
            Expr::col(rooms::Column::LockVersion).add(1),
        )
        .filter(rooms::Column::Id.eq(id))
        .filter(rooms::Column::LockVersion.eq(expected_version))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        // Either the room doesn't exist or the lock version doesn't match
        let room = rooms::Entity::find_by_id(id).one(conn).await?;
        if let Some(room) = room {
            let payload = format!(
                "OPTIMISTIC_LOCK:{{\"expected\":{},\"actual\":{}}}",
                expected_version, room.lock_version
            );
            return Err(sea_orm::DbErr::Custom(payload));
        } else {
            return Err(sea_orm::DbErr::Custom(format!("ROOM_NOT_FOUND:{id}")));
        }
    }

    rooms::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| sea_orm::DbErr::Custom(format!("ROOM_NOT_FOUND:{id}")))
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<Option<rooms::Model>, sea_orm::DbErr> {
    rooms::Entity::find()
        .filter(rooms::Column::Id.eq(room_id))
        .one(conn)
        .await
}

/// Find room by ID or return a structured not-found error.
pub async fn require_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<rooms::Model, sea_orm::DbErr> {
    find_by_id(conn, room_id)
        .await?
        .ok_or_else(|| sea_orm::DbErr::Custom(format!("ROOM_NOT_FOUND:{room_id}")))
}

/// List rooms in a given status, newest first (lobby listing).
pub async fn list_by_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    status: RoomStatus,
) -> Result<Vec<rooms::Model>, sea_orm::DbErr> {
    rooms::Entity::find()
        .filter(rooms::Column::Status.eq(status))
        .order_by_desc(rooms::Column::CreatedAt)
        .all(conn)
        .await
}

pub async fn create_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: RoomCreate,
) -> Result<rooms::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let room_active = rooms::ActiveModel {
        id: NotSet,
        name: Set(dto.name),
        status: Set(RoomStatus::Waiting),
        host_id: Set(dto.host_id),
        guest_id: NotSet,
        host_secret: NotSet,
        guest_secret: NotSet,
        current_turn_player_id: NotSet,
        winner_id: NotSet,
        instance_no: Set(1),
        rng_seed: Set(dto.rng_seed),
        created_at: Set(now),
        updated_at: Set(now),
        lock_version: Set(1),
    };

    room_active.insert(conn).await
}

/// Apply a transition's field changes in one atomic UPDATE.
pub async fn update_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: RoomUpdate,
) -> Result<rooms::Model, sea_orm::DbErr> {
    use sea_orm::sea_query::Expr;

    optimistic_update_then_fetch(conn, dto.id, dto.expected_version, |mut update| {
        if let Some(status) = dto.status {
            update = update.col_expr(rooms::Column::Status, Expr::val(status).into());
        }
        if let Some(guest_id) = dto.guest_id {
            update = update.col_expr(rooms::Column::GuestId, Expr::val(guest_id).into());
        }
        if let Some(host_secret) = dto.host_secret {
            update = update.col_expr(rooms::Column::HostSecret, Expr::val(host_secret).into());
        }
        if let Some(guest_secret) = dto.guest_secret {
            update = update.col_expr(rooms::Column::GuestSecret, Expr::val(guest_secret).into());
        }
        if let Some(turn) = dto.current_turn_player_id {
            update = update.col_expr(rooms::Column::CurrentTurnPlayerId, Expr::val(turn).into());
        }
        if let Some(winner) = dto.winner_id {
            update = update.col_expr(rooms::Column::WinnerId, Expr::val(winner).into());
        }
        if let Some(instance_no) = dto.instance_no {
            update = update.col_expr(rooms::Column::InstanceNo, Expr::val(instance_no).into());
        }
        update
    })
    .await
}
