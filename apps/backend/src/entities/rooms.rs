use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Room lifecycle status.
///
/// Stored as TEXT on every backend; the variants are the only legal values.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum RoomStatus {
    #[sea_orm(string_value = "WAITING")]
    Waiting,
    #[sea_orm(string_value = "PREPARING")]
    Preparing,
    #[sea_orm(string_value = "PLAYING")]
    Playing,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rooms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub status: RoomStatus,
    #[sea_orm(column_name = "host_id")]
    pub host_id: i64,
    #[sea_orm(column_name = "guest_id")]
    pub guest_id: Option<i64>,
    #[sea_orm(column_name = "host_secret")]
    pub host_secret: Option<String>,
    #[sea_orm(column_name = "guest_secret")]
    pub guest_secret: Option<String>,
    #[sea_orm(column_name = "current_turn_player_id")]
    pub current_turn_player_id: Option<i64>,
    #[sea_orm(column_name = "winner_id")]
    pub winner_id: Option<i64>,
    #[sea_orm(column_name = "instance_no")]
    pub instance_no: i32,
    #[sea_orm(column_name = "rng_seed", column_type = "VarBinary(StringLen::None)")]
    pub rng_seed: Vec<u8>,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
    #[sea_orm(column_name = "lock_version")]
    pub lock_version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::HostId",
        to = "super::users::Column::Id"
    )]
    Host,
    #[sea_orm(has_many = "super::game_rounds::Entity")]
    GameRounds,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Host.def()
    }
}

impl Related<super::game_rounds::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameRounds.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
