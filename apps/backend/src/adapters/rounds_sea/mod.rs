//! SeaORM adapter for the rounds repository.
//!
//! A round is stored as one `game_rounds` row plus its `round_actions`
//! rows; the expected player set comes from `game_players` seating for the
//! owning game. `save` enforces the optimistic lock with a filtered
//! `update_many` and checks `rows_affected`, so two concurrent saves of
//! the same version can never both commit; the version patch and the new
//! action rows are written in a single transaction.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use async_trait::async_trait;

use crate::domain::{ActionPayload, ActionType, Round, RoundAction, RoundStatus};
use crate::entities::{game_players, game_rounds, round_actions};
use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind};
use crate::repos::rounds::RoundsRepo;

pub mod dto;

pub use dto::{NewActionRow, RoundPatch};

/// Find a round row by id.
pub async fn find_round_row<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
) -> Result<Option<game_rounds::Model>, sea_orm::DbErr> {
    game_rounds::Entity::find_by_id(round_id).one(conn).await
}

/// Find all actions of a round, in submission order.
pub async fn find_actions<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
) -> Result<Vec<round_actions::Model>, sea_orm::DbErr> {
    round_actions::Entity::find()
        .filter(round_actions::Column::RoundId.eq(round_id))
        .order_by_asc(round_actions::Column::ActionOrder)
        .all(conn)
        .await
}

/// Seated player ids for a game, in turn order.
pub async fn find_seated_players<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<i64>, sea_orm::DbErr> {
    let seats = game_players::Entity::find()
        .filter(game_players::Column::GameId.eq(game_id))
        .order_by_asc(game_players::Column::TurnOrder)
        .all(conn)
        .await?;
    Ok(seats.into_iter().map(|s| s.player_id).collect())
}

/// Apply an optimistically-guarded round patch; returns rows affected
/// (0 means the expected version no longer matches).
pub async fn apply_round_patch<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    patch: RoundPatch,
) -> Result<u64, sea_orm::DbErr> {
    let result = game_rounds::Entity::update_many()
        .col_expr(game_rounds::Column::Status, Expr::value(patch.status))
        .col_expr(game_rounds::Column::FinishedAt, Expr::value(patch.finished_at))
        .col_expr(
            game_rounds::Column::LockVersion,
            Expr::value(patch.expected_version + 1),
        )
        .filter(game_rounds::Column::Id.eq(patch.round_id))
        .filter(game_rounds::Column::LockVersion.eq(patch.expected_version))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

/// Count existing actions of a round.
pub async fn count_actions<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    round_actions::Entity::find()
        .filter(round_actions::Column::RoundId.eq(round_id))
        .count(conn)
        .await
}

/// Insert new action rows.
pub async fn insert_actions<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    rows: Vec<NewActionRow>,
) -> Result<(), sea_orm::DbErr> {
    for row in rows {
        let action = round_actions::ActiveModel {
            id: sea_orm::NotSet,
            round_id: Set(row.round_id),
            player_id: Set(row.player_id),
            action_type: Set(row.action_type),
            payload: Set(row.payload),
            action_order: Set(row.action_order),
            created_at: Set(row.created_at),
        };
        action.insert(conn).await?;
    }
    Ok(())
}

/// Rounds repository backed by Postgres.
pub struct SeaRoundsRepo {
    conn: DatabaseConnection,
}

impl SeaRoundsRepo {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl RoundsRepo for SeaRoundsRepo {
    async fn find_by_id(&self, round_id: i64) -> Result<Option<Round>, DomainError> {
        let Some(row) = find_round_row(&self.conn, round_id).await? else {
            return Ok(None);
        };

        let action_rows = find_actions(&self.conn, round_id).await?;
        let expected_players = find_seated_players(&self.conn, row.game_id).await?;

        let mut actions = Vec::with_capacity(action_rows.len());
        for action_row in action_rows {
            actions.push(action_from_row(action_row)?);
        }

        Ok(Some(Round {
            id: row.id,
            game_id: row.game_id,
            expected_players,
            actions,
            status: row.status.into(),
            lock_version: row.lock_version,
            created_at: row.created_at,
            finished_at: row.finished_at,
        }))
    }

    async fn save(&self, round: &Round) -> Result<Round, DomainError> {
        // The version patch and the action rows commit together or not at
        // all; a round must never be durably `Complete` without its final
        // action.
        let txn = self.conn.begin().await?;

        let rows = apply_round_patch(
            &txn,
            RoundPatch {
                round_id: round.id,
                status: round.status.into(),
                finished_at: round.finished_at,
                expected_version: round.lock_version,
            },
        )
        .await?;

        if rows == 0 {
            txn.rollback().await?;
            return Err(DomainError::conflict(
                ConflictKind::OptimisticLock,
                format!(
                    "round {} was modified concurrently (expected version {})",
                    round.id, round.lock_version
                ),
            ));
        }

        // Append-only: rows past the persisted count are new.
        let existing = count_actions(&txn, round.id).await? as usize;
        let mut new_rows = Vec::new();
        for (idx, action) in round.actions.iter().enumerate().skip(existing) {
            new_rows.push(NewActionRow {
                round_id: round.id,
                player_id: action.player_id,
                action_type: action.action_type().into(),
                payload: payload_to_json(&action.payload)?,
                action_order: idx as i16,
                created_at: action.created_at,
            });
        }
        insert_actions(&txn, new_rows).await?;

        txn.commit().await?;

        let mut saved = round.clone();
        saved.lock_version += 1;
        Ok(saved)
    }
}

fn payload_to_json(payload: &ActionPayload) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(payload).map_err(|e| {
        DomainError::infra(
            InfraErrorKind::DataCorruption,
            format!("unserializable action payload: {e}"),
        )
    })
}

fn action_from_row(row: round_actions::Model) -> Result<RoundAction, DomainError> {
    let payload: ActionPayload = serde_json::from_value(row.payload).map_err(|e| {
        DomainError::infra(
            InfraErrorKind::DataCorruption,
            format!("stored payload of action {} is unreadable: {e}", row.id),
        )
    })?;

    let column_type: ActionType = row.action_type.into();
    if payload.action_type() != column_type {
        return Err(DomainError::infra(
            InfraErrorKind::DataCorruption,
            format!(
                "action {} column says {:?} but payload is {:?}",
                row.id,
                column_type,
                payload.action_type()
            ),
        ));
    }

    Ok(RoundAction {
        player_id: row.player_id,
        payload,
        created_at: row.created_at,
    })
}

// Conversions between SeaORM enums and domain enums

impl From<game_rounds::RoundStatus> for RoundStatus {
    fn from(s: game_rounds::RoundStatus) -> Self {
        match s {
            game_rounds::RoundStatus::Open => RoundStatus::Open,
            game_rounds::RoundStatus::Complete => RoundStatus::Complete,
            game_rounds::RoundStatus::Finished => RoundStatus::Finished,
        }
    }
}

impl From<RoundStatus> for game_rounds::RoundStatus {
    fn from(s: RoundStatus) -> Self {
        match s {
            RoundStatus::Open => game_rounds::RoundStatus::Open,
            RoundStatus::Complete => game_rounds::RoundStatus::Complete,
            RoundStatus::Finished => game_rounds::RoundStatus::Finished,
        }
    }
}

impl From<round_actions::ActionKind> for ActionType {
    fn from(k: round_actions::ActionKind) -> Self {
        match k {
            round_actions::ActionKind::PlayCard => ActionType::PlayCard,
            round_actions::ActionKind::Bet => ActionType::Bet,
            round_actions::ActionKind::Fold => ActionType::Fold,
        }
    }
}

impl From<ActionType> for round_actions::ActionKind {
    fn from(k: ActionType) -> Self {
        match k {
            ActionType::PlayCard => round_actions::ActionKind::PlayCard,
            ActionType::Bet => round_actions::ActionKind::Bet,
            ActionType::Fold => round_actions::ActionKind::Fold,
        }
    }
}
