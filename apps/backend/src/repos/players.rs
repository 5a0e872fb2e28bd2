//! Player repository seam and domain model.

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::errors::domain::DomainError;

/// Player identity. Created and managed outside the round-flow core;
/// this crate only reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: i64,
    pub display_name: String,
    pub created_at: OffsetDateTime,
}

impl Player {
    pub fn new(id: i64, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

#[async_trait]
pub trait PlayersRepo: Send + Sync {
    async fn find_by_id(&self, player_id: i64) -> Result<Option<Player>, DomainError>;
}
