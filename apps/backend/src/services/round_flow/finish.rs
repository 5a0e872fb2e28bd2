//! Round finishing boundary.
//!
//! The finishing computation (scoring, payout, next-round setup) lives
//! outside this core; only its invocation contract is fixed here. The
//! cascade in `perform_action` invokes it exactly once per round, on the
//! call that persisted the `Open -> Complete` transition.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::info;

use crate::domain::{Round, RoundStatus};
use crate::repos::rounds::RoundsRepo;

/// Failure of the finishing computation. The triggering action stays
/// recorded and persisted; only the finishing step is reported failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("round finishing failed: {}", reasons.join("; "))]
pub struct FinishingError {
    pub reasons: Vec<String>,
}

impl FinishingError {
    pub fn new(reasons: Vec<String>) -> Self {
        Self { reasons }
    }

    pub fn reason(detail: impl Into<String>) -> Self {
        Self {
            reasons: vec![detail.into()],
        }
    }
}

#[async_trait]
pub trait RoundFinisher: Send + Sync {
    /// Finish a completed round. Success returns the round in its
    /// finished state; failure returns the reasons, in order.
    async fn perform(&self, round: &Round) -> Result<Round, FinishingError>;
}

/// Minimal production finisher: persists the `Complete -> Finished`
/// transition and stamps `finished_at`. Games with real scoring wire
/// their own `RoundFinisher` in front of this.
pub struct MarkFinished {
    rounds: Arc<dyn RoundsRepo>,
}

impl MarkFinished {
    pub fn new(rounds: Arc<dyn RoundsRepo>) -> Self {
        Self { rounds }
    }
}

#[async_trait]
impl RoundFinisher for MarkFinished {
    async fn perform(&self, round: &Round) -> Result<Round, FinishingError> {
        if round.status != RoundStatus::Complete {
            return Err(FinishingError::reason(format!(
                "round {} is not complete",
                round.id
            )));
        }

        let mut finished = round.clone();
        finished.status = RoundStatus::Finished;
        finished.finished_at = Some(OffsetDateTime::now_utc());

        let saved = self
            .rounds
            .save(&finished)
            .await
            .map_err(|e| FinishingError::reason(e.to_string()))?;

        info!(round_id = saved.id, game_id = saved.game_id, "Round finished");
        Ok(saved)
    }
}
