//! The act-in-round operation.
//!
//! Pipeline per request: parameter validation, round/player resolution,
//! eligibility, construction, append, persist, completion cascade,
//! notification. Every failure short-circuits; in particular a not-found
//! lookup stops the pipeline before any domain check runs.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::RoundFlowService;
use crate::domain::{ActionType, Round, RoundAction, RoundStatus};
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError};
use crate::errors::ErrorCode;
use crate::repos::players::Player;

/// Bound on optimistic-lock retries of the check-append-persist sequence.
/// A full table submitting at once costs at most one conflict per rival.
const MAX_SAVE_ATTEMPTS: u32 = 5;

/// Reference to a round: the value itself, or an id to look up.
#[derive(Debug, Clone)]
pub enum RoundRef {
    Round(Box<Round>),
    Id(i64),
}

/// Reference to a player: the value itself, or an id to look up.
#[derive(Debug, Clone)]
pub enum PlayerRef {
    Player(Player),
    Id(i64),
}

/// Input of `perform_action`, as handed over by the upstream API layer.
/// Structural validation happens inside the operation, so all fields are
/// optional here and violations are reported together.
#[derive(Debug, Clone, Default)]
pub struct ActionRequest {
    pub action_type: Option<String>,
    pub payload: Option<Value>,
    pub round: Option<RoundRef>,
    pub player: Option<PlayerRef>,
}

/// Failure taxonomy of the act-in-round operation. `reasons()` yields the
/// ordered, human-readable causes the upstream layer reports.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActError {
    #[error("invalid request parameters")]
    Validation(Vec<String>),
    #[error("round not found: {0}")]
    RoundNotFound(String),
    #[error("player not found: {0}")]
    PlayerNotFound(String),
    #[error("player may not act: {0}")]
    Ineligible(String),
    #[error("invalid action: {0}")]
    InvalidAction(String),
    #[error("persistence failure: {0}")]
    Persistence(String),
    #[error("round finishing failed")]
    Finishing(Vec<String>),
}

impl ActError {
    pub fn reasons(&self) -> Vec<String> {
        match self {
            ActError::Validation(reasons) | ActError::Finishing(reasons) => reasons.clone(),
            ActError::RoundNotFound(r)
            | ActError::PlayerNotFound(r)
            | ActError::Ineligible(r)
            | ActError::InvalidAction(r)
            | ActError::Persistence(r) => vec![r.clone()],
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ActError::Validation(_) => ErrorCode::ValidationError,
            ActError::RoundNotFound(_) => ErrorCode::RoundNotFound,
            ActError::PlayerNotFound(_) => ErrorCode::PlayerNotFound,
            ActError::Ineligible(_) => ErrorCode::IneligibleAction,
            ActError::InvalidAction(_) => ErrorCode::InvalidAction,
            ActError::Persistence(_) => ErrorCode::PersistenceFailure,
            ActError::Finishing(_) => ErrorCode::FinishingFailure,
        }
    }

    /// Repository faults surface as persistence failures; the taxonomy
    /// keeps not-found distinct because it is produced by resolution, not
    /// by the store.
    fn from_repo(err: DomainError) -> Self {
        ActError::Persistence(err.to_string())
    }
}

impl From<ActError> for AppError {
    fn from(err: ActError) -> Self {
        let code = err.code();
        let detail = err.reasons().join("; ");
        match err {
            ActError::Validation(_) | ActError::InvalidAction(_) | ActError::Ineligible(_) => {
                AppError::validation(code, detail)
            }
            ActError::RoundNotFound(_) | ActError::PlayerNotFound(_) => {
                AppError::not_found(code, detail)
            }
            ActError::Persistence(_) => AppError::db(detail),
            ActError::Finishing(_) => AppError::internal(detail),
        }
    }
}

impl RoundFlowService {
    /// Accept one player's action within one round.
    ///
    /// On success returns the updated round: still open, or complete and
    /// finished when this action was the last expected one and the
    /// finishing step succeeded. The check-append-persist sequence is
    /// serialized per round by the repository's optimistic lock and
    /// retried on conflict; the finishing cascade runs at most once per
    /// round, on the call that committed the completing save.
    pub async fn perform_action(&self, request: ActionRequest) -> Result<Round, ActError> {
        // 1. Structural validation, all violations at once.
        let (action_type_raw, payload, round_ref, player_ref) = validate_params(request)?;

        // 2. Resolution. A missing round or player halts the pipeline.
        let round = self.resolve_round(round_ref).await?;
        let player = self.resolve_player(player_ref).await?;

        // 3. Eligibility against the resolved round. An ineligible player
        // is reported as such even if the payload is also malformed; the
        // retry loop re-checks under the optimistic lock.
        if !round.can_player_act(player.id) {
            return Err(ActError::Ineligible(ineligibility_detail(&round, player.id)));
        }

        // 4. Construction is pure; no mutable state touched yet.
        let kind = ActionType::parse(&action_type_raw)
            .map_err(|e| ActError::InvalidAction(e.to_string()))?;
        let action = RoundAction::build(kind, &payload, player.id)
            .map_err(|e| ActError::InvalidAction(e.to_string()))?;

        // 5. Append and persist; retried on optimistic conflict.
        let (saved, became_complete) = self.append_and_persist(round, &player, action).await?;

        // 6. Completion cascade, at most once per round.
        let result = if became_complete {
            info!(
                round_id = saved.id,
                game_id = saved.game_id,
                "Round complete, invoking finisher"
            );
            match self.finisher.perform(&saved).await {
                Ok(finished) => finished,
                Err(err) => return Err(ActError::Finishing(err.reasons)),
            }
        } else {
            saved
        };

        // 7. Best-effort notification; faults are logged, never escalated.
        if let Err(err) = self.notifier.notify_game_changed(result.game_id).await {
            warn!(
                game_id = result.game_id,
                error = %err,
                "State change notification failed"
            );
        }

        Ok(result)
    }

    async fn resolve_round(&self, round_ref: RoundRef) -> Result<Round, ActError> {
        match round_ref {
            RoundRef::Round(round) => Ok(*round),
            RoundRef::Id(id) => self
                .rounds
                .find_by_id(id)
                .await
                .map_err(ActError::from_repo)?
                .ok_or_else(|| ActError::RoundNotFound(format!("round {id} does not exist"))),
        }
    }

    async fn resolve_player(&self, player_ref: PlayerRef) -> Result<Player, ActError> {
        match player_ref {
            PlayerRef::Player(player) => Ok(player),
            PlayerRef::Id(id) => self
                .players
                .find_by_id(id)
                .await
                .map_err(ActError::from_repo)?
                .ok_or_else(|| ActError::PlayerNotFound(format!("player {id} does not exist"))),
        }
    }

    /// Re-check eligibility against the freshest round state, append, set
    /// `Complete` when this action is the last expected one, and persist
    /// under the optimistic lock. On conflict the round is re-fetched and
    /// the whole sequence re-evaluated, so a lost race surfaces as
    /// ineligibility rather than a double append.
    async fn append_and_persist(
        &self,
        mut round: Round,
        player: &Player,
        action: RoundAction,
    ) -> Result<(Round, bool), ActError> {
        let mut attempts = 0;
        loop {
            attempts += 1;

            if !round.can_player_act(player.id) {
                return Err(ActError::Ineligible(ineligibility_detail(&round, player.id)));
            }

            let mut updated = round.clone();
            updated
                .record_action(action.clone())
                .map_err(|e| ActError::Ineligible(e.to_string()))?;

            let became_complete = updated.everybody_played();
            if became_complete {
                updated.status = RoundStatus::Complete;
            }

            match self.rounds.save(&updated).await {
                Ok(saved) => {
                    debug!(
                        round_id = saved.id,
                        player_id = player.id,
                        action_type = action.action_type().as_str(),
                        actions = saved.actions.len(),
                        "Action persisted"
                    );
                    return Ok((saved, became_complete));
                }
                Err(DomainError::Conflict(ConflictKind::OptimisticLock, detail)) => {
                    if attempts >= MAX_SAVE_ATTEMPTS {
                        return Err(ActError::Persistence(format!(
                            "round {} stayed contended after {attempts} attempts: {detail}",
                            updated.id
                        )));
                    }
                    debug!(
                        round_id = updated.id,
                        attempts, "Optimistic conflict, re-fetching round"
                    );
                    round = self
                        .rounds
                        .find_by_id(updated.id)
                        .await
                        .map_err(ActError::from_repo)?
                        .ok_or_else(|| {
                            ActError::RoundNotFound(format!("round {} disappeared", updated.id))
                        })?;
                }
                Err(other) => return Err(ActError::from_repo(other)),
            }
        }
    }
}

fn validate_params(
    request: ActionRequest,
) -> Result<(String, Value, RoundRef, PlayerRef), ActError> {
    let mut reasons = Vec::new();

    let action_type = match request.action_type {
        Some(raw) if !raw.trim().is_empty() => Some(raw),
        _ => {
            reasons.push("action type is required".to_string());
            None
        }
    };

    let payload = match request.payload {
        Some(value) if !value.is_null() => Some(value),
        _ => {
            reasons.push("action payload is required".to_string());
            None
        }
    };

    if request.round.is_none() {
        reasons.push("round or round id is required".to_string());
    }
    if request.player.is_none() {
        reasons.push("player or player id is required".to_string());
    }

    match (action_type, payload, request.round, request.player) {
        (Some(action_type), Some(payload), Some(round), Some(player)) if reasons.is_empty() => {
            Ok((action_type, payload, round, player))
        }
        _ => Err(ActError::Validation(reasons)),
    }
}

fn ineligibility_detail(round: &Round, player_id: i64) -> String {
    if round.status != RoundStatus::Open {
        format!("round {} no longer accepts actions", round.id)
    } else if round.has_acted(player_id) {
        format!("player {player_id} already acted in round {}", round.id)
    } else {
        format!("player {player_id} is not seated in round {}", round.id)
    }
}
