mod common;

// DB-backed adapter tests. These need a Postgres reachable through the
// Test profile env vars (TEST_DB ending in `_test`, APP_DB_USER,
// APP_DB_PASSWORD), so they are ignored by default:
//
//   cargo test --test adapters_rounds_sea_test -- --ignored

use sea_orm::{ActiveModelTrait, Set};
use serde_json::json;
use time::OffsetDateTime;

use ronda_backend::adapters::rounds_sea::SeaRoundsRepo;
use ronda_backend::domain::{ActionType, RoundAction, RoundStatus};
use ronda_backend::entities::{game_players, game_rounds, players};
use ronda_backend::errors::domain::{ConflictKind, DomainError};
use ronda_backend::repos::rounds::RoundsRepo;
use ronda_backend::{connect_db, DbOwner, DbProfile};

async fn seed_round(
    conn: &sea_orm::DatabaseConnection,
    game_id: i64,
    seats: &[i64],
) -> Result<i64, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();

    for (order, player_id) in seats.iter().enumerate() {
        players::ActiveModel {
            id: Set(*player_id),
            display_name: Set(format!("player-{player_id}")),
            created_at: Set(now),
        }
        .insert(conn)
        .await?;

        game_players::ActiveModel {
            id: sea_orm::NotSet,
            game_id: Set(game_id),
            player_id: Set(*player_id),
            turn_order: Set(order as i16),
        }
        .insert(conn)
        .await?;
    }

    let round = game_rounds::ActiveModel {
        id: sea_orm::NotSet,
        game_id: Set(game_id),
        status: Set(game_rounds::RoundStatus::Open),
        lock_version: Set(0),
        created_at: Set(now),
        finished_at: Set(None),
    }
    .insert(conn)
    .await?;

    Ok(round.id)
}

#[tokio::test]
#[ignore = "requires Postgres (Test profile env vars)"]
async fn find_by_id_maps_round_actions_and_seats() {
    let conn = connect_db(DbProfile::Test, DbOwner::App).await.unwrap();
    let game_id = OffsetDateTime::now_utc().unix_timestamp_nanos() as i64;
    let round_id = seed_round(&conn, game_id, &[game_id + 1, game_id + 2])
        .await
        .unwrap();

    let repo = SeaRoundsRepo::new(conn);
    let round = repo.find_by_id(round_id).await.unwrap().unwrap();

    assert_eq!(round.game_id, game_id);
    assert_eq!(round.status, RoundStatus::Open);
    assert_eq!(round.expected_players, vec![game_id + 1, game_id + 2]);
    assert!(round.actions.is_empty());
}

#[tokio::test]
#[ignore = "requires Postgres (Test profile env vars)"]
async fn save_appends_actions_and_bumps_version() {
    let conn = connect_db(DbProfile::Test, DbOwner::App).await.unwrap();
    let game_id = OffsetDateTime::now_utc().unix_timestamp_nanos() as i64;
    let round_id = seed_round(&conn, game_id, &[game_id + 1, game_id + 2])
        .await
        .unwrap();

    let repo = SeaRoundsRepo::new(conn);
    let mut round = repo.find_by_id(round_id).await.unwrap().unwrap();

    let action =
        RoundAction::build(ActionType::Bet, &json!({"chips": 10}), game_id + 1).unwrap();
    round.record_action(action).unwrap();

    let saved = repo.save(&round).await.unwrap();
    assert_eq!(saved.lock_version, 1);

    let reloaded = repo.find_by_id(round_id).await.unwrap().unwrap();
    assert_eq!(reloaded.lock_version, 1);
    assert_eq!(reloaded.actions.len(), 1);
    assert_eq!(reloaded.actions[0].player_id, game_id + 1);
    assert_eq!(reloaded.actions[0].action_type(), ActionType::Bet);
}

/// A stale save conflicts and commits nothing: neither the version patch
/// nor the action rows it carried survive the rollback.
#[tokio::test]
#[ignore = "requires Postgres (Test profile env vars)"]
async fn stale_save_conflicts_and_writes_nothing() {
    let conn = connect_db(DbProfile::Test, DbOwner::App).await.unwrap();
    let game_id = OffsetDateTime::now_utc().unix_timestamp_nanos() as i64;
    let round_id = seed_round(&conn, game_id, &[game_id + 1]).await.unwrap();

    let repo = SeaRoundsRepo::new(conn);
    let mut stale = repo.find_by_id(round_id).await.unwrap().unwrap();
    repo.save(&stale).await.unwrap();

    let action = RoundAction::build(ActionType::Fold, &json!({}), game_id + 1).unwrap();
    stale.record_action(action).unwrap();

    let err = repo.save(&stale).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::OptimisticLock, _)
    ));

    let reloaded = repo.find_by_id(round_id).await.unwrap().unwrap();
    assert_eq!(reloaded.lock_version, 1);
    assert!(reloaded.actions.is_empty());
}
