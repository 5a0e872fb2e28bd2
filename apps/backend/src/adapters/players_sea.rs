//! SeaORM adapter for the players repository.

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait};

use crate::entities::players;
use crate::errors::domain::DomainError;
use crate::repos::players::{Player, PlayersRepo};

/// Find a player row by id.
pub async fn find_player_row<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Option<players::Model>, sea_orm::DbErr> {
    players::Entity::find_by_id(player_id).one(conn).await
}

/// Players repository backed by Postgres.
pub struct SeaPlayersRepo {
    conn: DatabaseConnection,
}

impl SeaPlayersRepo {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl PlayersRepo for SeaPlayersRepo {
    async fn find_by_id(&self, player_id: i64) -> Result<Option<Player>, DomainError> {
        let row = find_player_row(&self.conn, player_id).await?;
        Ok(row.map(Player::from))
    }
}

impl From<players::Model> for Player {
    fn from(model: players::Model) -> Self {
        Self {
            id: model.id,
            display_name: model.display_name,
            created_at: model.created_at,
        }
    }
}
