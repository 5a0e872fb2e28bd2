//! Round repository seam.
//!
//! The round-flow service only ever talks to storage through this trait.
//! Implementations: `adapters::rounds_sea::SeaRoundsRepo` (Postgres via
//! SeaORM) and `adapters::memory::InMemoryRounds` (tests, default state).

use async_trait::async_trait;

use crate::domain::Round;
use crate::errors::domain::DomainError;

#[async_trait]
pub trait RoundsRepo: Send + Sync {
    /// Fetch a round with its ordered actions and expected player set.
    async fn find_by_id(&self, round_id: i64) -> Result<Option<Round>, DomainError>;

    /// Persist the round's new state.
    ///
    /// Compare-and-swap on `round.lock_version`: if the stored version
    /// differs, fails with `Conflict(OptimisticLock)` and writes nothing.
    /// On success returns the round with the bumped version. This is the
    /// per-round serialization point for concurrent act-in-round calls.
    async fn save(&self, round: &Round) -> Result<Round, DomainError>;
}
