//! Round flow orchestration - accepts one player's action within a round,
//! detects completion, and drives the finishing cascade.
//!
//! All collaborators are injected capabilities so the service is testable
//! without a database or transport.

use std::sync::Arc;

use crate::notify::StateNotifier;
use crate::repos::players::PlayersRepo;
use crate::repos::rounds::RoundsRepo;

mod act;
pub mod finish;

pub use act::{ActError, ActionRequest, PlayerRef, RoundRef};
pub use finish::{FinishingError, MarkFinished, RoundFinisher};

/// Round flow service. One instance per process; operations are async and
/// safe to call concurrently, with per-round serialization provided by the
/// repository's optimistic lock.
pub struct RoundFlowService {
    rounds: Arc<dyn RoundsRepo>,
    players: Arc<dyn PlayersRepo>,
    finisher: Arc<dyn RoundFinisher>,
    notifier: Arc<dyn StateNotifier>,
}

impl RoundFlowService {
    pub fn new(
        rounds: Arc<dyn RoundsRepo>,
        players: Arc<dyn PlayersRepo>,
        finisher: Arc<dyn RoundFinisher>,
        notifier: Arc<dyn StateNotifier>,
    ) -> Self {
        Self {
            rounds,
            players,
            finisher,
            notifier,
        }
    }
}
