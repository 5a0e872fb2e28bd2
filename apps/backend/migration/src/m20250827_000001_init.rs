use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::extension::postgres::Type as PgType;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Players {
    Table,
    Id,
    DisplayName,
    CreatedAt,
}

#[derive(Iden)]
enum GamePlayers {
    Table,
    Id,
    GameId,
    PlayerId,
    TurnOrder,
}

#[derive(Iden)]
enum GameRounds {
    Table,
    Id,
    GameId,
    Status,
    LockVersion,
    CreatedAt,
    FinishedAt,
}

#[derive(Iden)]
enum RoundActions {
    Table,
    Id,
    RoundId,
    PlayerId,
    ActionType,
    Payload,
    ActionOrder,
    CreatedAt,
}

#[derive(Iden)]
enum RoundStatusEnum {
    #[iden = "round_status"]
    Type,
}

#[derive(Iden)]
enum ActionKindEnum {
    #[iden = "action_kind"]
    Type,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Postgres enums
        manager
            .create_type(
                PgType::create()
                    .as_enum(RoundStatusEnum::Type)
                    .values(["OPEN", "COMPLETE", "FINISHED"])
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                PgType::create()
                    .as_enum(ActionKindEnum::Type)
                    .values(["PLAY_CARD", "BET", "FOLD"])
                    .to_owned(),
            )
            .await?;

        // players
        manager
            .create_table(
                Table::create()
                    .table(Players::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Players::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Players::DisplayName).text().not_null())
                    .col(
                        ColumnDef::new(Players::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // game_players (seating, ordered by turn_order)
        manager
            .create_table(
                Table::create()
                    .table(GamePlayers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GamePlayers::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(GamePlayers::GameId).big_integer().not_null())
                    .col(
                        ColumnDef::new(GamePlayers::PlayerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GamePlayers::TurnOrder)
                            .small_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_players_player_id")
                            .from(GamePlayers::Table, GamePlayers::PlayerId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_game_players_game_player")
                    .table(GamePlayers::Table)
                    .col(GamePlayers::GameId)
                    .col(GamePlayers::PlayerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_game_players_game_turn_order")
                    .table(GamePlayers::Table)
                    .col(GamePlayers::GameId)
                    .col(GamePlayers::TurnOrder)
                    .unique()
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
                    .col(ColumnDef::new(GameRounds::GameId).big_integer().not_null())
                    .col(
                        ColumnDef::new(GameRounds::Status)
                            .custom(RoundStatusEnum::Type)
                            .not_null()
                            .default("OPEN"),
                    )
                    .col(
                        ColumnDef::new(GameRounds::LockVersion)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(GameRounds::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameRounds::FinishedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_game_rounds_game_id")
                    .table(GameRounds::Table)
                    .col(GameRounds::GameId)
                    .to_owned(),
            )
            .await?;

        // round_actions
        manager
            .create_table(
                Table::create()
                    .table(RoundActions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RoundActions::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(
                        ColumnDef::new(RoundActions::RoundId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RoundActions::PlayerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RoundActions::ActionType)
                            .custom(ActionKindEnum::Type)
                            .not_null(),
                    )
                    .col(ColumnDef::new(RoundActions::Payload).json_binary().not_null())
                    .col(
                        ColumnDef::new(RoundActions::ActionOrder)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RoundActions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_round_actions_round_id")
                            .from(RoundActions::Table, RoundActions::RoundId)
                            .to(GameRounds::Table, GameRounds::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_round_actions_player_id")
                            .from(RoundActions::Table, RoundActions::PlayerId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // one action per player per round
        manager
            .create_index(
                Index::create()
                    .name("ux_round_actions_round_player")
                    .table(RoundActions::Table)
                    .col(RoundActions::RoundId)
                    .col(RoundActions::PlayerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_round_actions_round_order")
                    .table(RoundActions::Table)
                    .col(RoundActions::RoundId)
                    .col(RoundActions::ActionOrder)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RoundActions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GameRounds::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GamePlayers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Players::Table).to_owned())
            .await?;

        // Drop enum types
        manager
            .drop_type(PgType::drop().name(ActionKindEnum::Type).to_owned())
            .await?;
        manager
            .drop_type(PgType::drop().name(RoundStatusEnum::Type).to_owned())
            .await?;

        Ok(())
    }
}
