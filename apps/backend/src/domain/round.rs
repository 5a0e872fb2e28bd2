//! Round entity: ordered actions, eligibility, and completion.

use time::OffsetDateTime;

use crate::domain::actions::RoundAction;
use crate::errors::domain::{DomainError, ValidationKind};

/// Lifecycle of a round as seen by the act-in-round operation.
///
/// `Open` accepts actions. `Complete` means every expected player has acted
/// and finishing is pending or has failed. `Finished` means the finishing
/// step succeeded; the round is immutable from then on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    Open,
    Complete,
    Finished,
}

/// One decision phase of a game session.
///
/// `actions` is append-only while the round is open; insertion order is
/// submission order. `expected_players` is the seated player set supplied
/// by the owning game when the round starts. `lock_version` is the
/// optimistic-concurrency token checked by repositories at persist time.
#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    pub id: i64,
    pub game_id: i64,
    pub expected_players: Vec<i64>,
    pub actions: Vec<RoundAction>,
    pub status: RoundStatus,
    pub lock_version: i32,
    pub created_at: OffsetDateTime,
    pub finished_at: Option<OffsetDateTime>,
}

impl Round {
    /// A fresh open round for the given seated players.
    pub fn new(id: i64, game_id: i64, expected_players: Vec<i64>) -> Self {
        Self {
            id,
            game_id,
            expected_players,
            actions: Vec::new(),
            status: RoundStatus::Open,
            lock_version: 0,
            created_at: OffsetDateTime::now_utc(),
            finished_at: None,
        }
    }

    pub fn has_acted(&self, player_id: i64) -> bool {
        self.actions.iter().any(|a| a.player_id == player_id)
    }

    fn is_expected(&self, player_id: i64) -> bool {
        self.expected_players.contains(&player_id)
    }

    /// Whether the given player may submit an action right now.
    ///
    /// False once the player has an action recorded, once the round has
    /// left the open state, or if the player is not seated in this round.
    pub fn can_player_act(&self, player_id: i64) -> bool {
        self.status == RoundStatus::Open
            && self.is_expected(player_id)
            && !self.has_acted(player_id)
    }

    /// Whether every expected player has exactly one recorded action.
    ///
    /// Recomputed from `actions` on every call; a round with no expected
    /// players can never complete.
    pub fn everybody_played(&self) -> bool {
        !self.expected_players.is_empty()
            && self.expected_players.iter().all(|p| self.has_acted(*p))
    }

    /// Append an action. Callers gate on `can_player_act` first; the
    /// duplicate and closed-round checks here are a second line of defense
    /// so the append-only invariants hold even on a misuse path.
    pub fn record_action(&mut self, action: RoundAction) -> Result<(), DomainError> {
        if self.status != RoundStatus::Open {
            return Err(DomainError::validation(
                ValidationKind::RoundClosed,
                format!("round {} no longer accepts actions", self.id),
            ));
        }
        if self.has_acted(action.player_id) {
            return Err(DomainError::validation(
                ValidationKind::DuplicateAction,
                format!(
                    "player {} already acted in round {}",
                    action.player_id, self.id
                ),
            ));
        }
        self.actions.push(action);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::actions::{ActionType, RoundAction};

    fn bet(player_id: i64) -> RoundAction {
        RoundAction::build(ActionType::Bet, &json!({"chips": 10}), player_id).unwrap()
    }

    #[test]
    fn fresh_round_lets_every_seated_player_act() {
        let round = Round::new(1, 100, vec![1, 2, 3]);
        assert!(round.can_player_act(1));
        assert!(round.can_player_act(3));
        assert!(!round.everybody_played());
    }

    #[test]
    fn unseated_player_cannot_act() {
        let round = Round::new(1, 100, vec![1, 2]);
        assert!(!round.can_player_act(42));
    }

    #[test]
    fn eligibility_is_monotonic_once_acted() {
        let mut round = Round::new(1, 100, vec![1, 2]);
        round.record_action(bet(1)).unwrap();
        assert!(!round.can_player_act(1));
        round.record_action(bet(2)).unwrap();
        assert!(!round.can_player_act(1));
        assert!(round.everybody_played());
    }

    #[test]
    fn duplicate_action_is_rejected() {
        let mut round = Round::new(1, 100, vec![1, 2]);
        round.record_action(bet(1)).unwrap();
        let err = round.record_action(bet(1)).unwrap_err();
        match err {
            DomainError::Validation(ValidationKind::DuplicateAction, _) => {}
            other => panic!("expected DuplicateAction, got {other:?}"),
        }
        assert_eq!(round.actions.len(), 1);
    }

    #[test]
    fn closed_round_rejects_actions() {
        let mut round = Round::new(1, 100, vec![1, 2]);
        round.status = RoundStatus::Complete;
        assert!(!round.can_player_act(1));
        let err = round.record_action(bet(1)).unwrap_err();
        match err {
            DomainError::Validation(ValidationKind::RoundClosed, _) => {}
            other => panic!("expected RoundClosed, got {other:?}"),
        }
    }

    #[test]
    fn round_with_no_expected_players_never_completes() {
        let round = Round::new(1, 100, Vec::new());
        assert!(!round.everybody_played());
    }
}
