use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Users {
    Table,
    Id,
    Username,
    TotalGames,
    Wins,
    TotalRounds,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Rooms {
    Table,
    Id,
    Name,
    Status,
    HostId,
    GuestId,
    HostSecret,
    GuestSecret,
    CurrentTurnPlayerId,
    WinnerId,
    InstanceNo,
    RngSeed,
    CreatedAt,
    UpdatedAt,
    LockVersion,
}

#[derive(Iden)]
enum GameRounds {
    Table,
    Id,
    RoomId,
    InstanceNo,
    PlayerId,
    GuessDigits,
    MatchCount,
    RoundNumber,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // users
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Users::Username).string().not_null())
                    .col(
                        ColumnDef::new(Users::TotalGames)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Users::Wins).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Users::TotalRounds)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_username_unique")
                    .table(Users::Table)
                    .col(Users::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // rooms
        // Status is stored as TEXT on every backend; the set of legal values is
        // owned by the entity's active enum, not the schema.
        manager
            .create_table(
                Table::create()
                    .table(Rooms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rooms::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Rooms::Name).string().not_null())
                    .col(ColumnDef::new(Rooms::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Rooms::HostId).big_integer().not_null())
                    .col(ColumnDef::new(Rooms::GuestId).big_integer().null())
                    .col(ColumnDef::new(Rooms::HostSecret).string_len(4).null())
                    .col(ColumnDef::new(Rooms::GuestSecret).string_len(4).null())
                    .col(
                        ColumnDef::new(Rooms::CurrentTurnPlayerId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(Rooms::WinnerId).big_integer().null())
                    .col(
                        ColumnDef::new(Rooms::InstanceNo)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Rooms::RngSeed).var_binary(32).not_null())
                    .col(
                        ColumnDef::new(Rooms::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Rooms::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Rooms::LockVersion)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rooms_host_id")
                            .from(Rooms::Table, Rooms::HostId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Lobby listings filter on status; keep that path indexed.
        manager
            .create_index(
                Index::create()
                    .name("idx_rooms_status")
                    .table(Rooms::Table)
                    .col(Rooms::Status)
                    .to_owned(),
            )
            .await?;

        // game_rounds
        manager
            .create_table(
                Table::create()
                    .table(GameRounds::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GameRounds::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(GameRounds::RoomId).big_integer().not_null())
                    .col(
                        ColumnDef::new(GameRounds::InstanceNo)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameRounds::PlayerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameRounds::GuessDigits)
                            .string_len(4)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameRounds::MatchCount)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameRounds::RoundNumber)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameRounds::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_rounds_room_id")
                            .from(GameRounds::Table, GameRounds::RoomId)
                            .to(Rooms::Table, Rooms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One guess per (room, instance, round_number, player); also the scan
        // path for active-round queries and instance purges.
        manager
            .create_index(
                Index::create()
                    .name("ux_game_rounds_room_instance_round_player")
                    .table(GameRounds::Table)
                    .col(GameRounds::RoomId)
                    .col(GameRounds::InstanceNo)
                    .col(GameRounds::RoundNumber)
                    .col(GameRounds::PlayerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GameRounds::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Rooms::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
