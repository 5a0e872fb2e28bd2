//! In-memory repository implementations.
//!
//! Same optimistic-concurrency contract as the SeaORM adapters: `save`
//! compare-and-swaps on `lock_version`. The DashMap entry guard makes the
//! compare-and-bump atomic per round, so concurrent act-in-round calls
//! against one round serialize exactly as they do against Postgres.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::Round;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::repos::players::{Player, PlayersRepo};
use crate::repos::rounds::RoundsRepo;

#[derive(Default)]
pub struct InMemoryRounds {
    rounds: DashMap<i64, Round>,
}

impl InMemoryRounds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a round, as the owning game does when a round starts.
    pub fn insert(&self, round: Round) {
        self.rounds.insert(round.id, round);
    }

    /// Direct read of the stored state, for assertions in tests.
    pub fn stored(&self, round_id: i64) -> Option<Round> {
        self.rounds.get(&round_id).map(|r| r.value().clone())
    }
}

#[async_trait]
impl RoundsRepo for InMemoryRounds {
    async fn find_by_id(&self, round_id: i64) -> Result<Option<Round>, DomainError> {
        Ok(self.rounds.get(&round_id).map(|r| r.value().clone()))
    }

    async fn save(&self, round: &Round) -> Result<Round, DomainError> {
        match self.rounds.entry(round.id) {
            Entry::Occupied(mut entry) => {
                let stored_version = entry.get().lock_version;
                if stored_version != round.lock_version {
                    return Err(DomainError::conflict(
                        ConflictKind::OptimisticLock,
                        format!(
                            "round {} was modified concurrently (expected version {}, stored {})",
                            round.id, round.lock_version, stored_version
                        ),
                    ));
                }
                let mut saved = round.clone();
                saved.lock_version += 1;
                entry.insert(saved.clone());
                Ok(saved)
            }
            Entry::Vacant(_) => Err(DomainError::not_found(
                NotFoundKind::Round,
                format!("round {} does not exist", round.id),
            )),
        }
    }
}

#[derive(Default)]
pub struct InMemoryPlayers {
    players: DashMap<i64, Player>,
}

impl InMemoryPlayers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, player: Player) {
        self.players.insert(player.id, player);
    }
}

#[async_trait]
impl PlayersRepo for InMemoryPlayers {
    async fn find_by_id(&self, player_id: i64) -> Result<Option<Player>, DomainError> {
        Ok(self.players.get(&player_id).map(|p| p.value().clone()))
    }
}
