//! Round actions and their type-dispatched construction.
//!
//! `ActionType` is the closed action vocabulary. Every type has exactly one
//! payload shape and one construction rule; `RoundAction::build` is a total
//! match over the enumeration with no fallback arm, so adding a variant
//! forces a construction rule at compile time.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::domain::cards::{Card, Rank, Suit};
use crate::errors::domain::{DomainError, ValidationKind};

/// Upper bound on a single bet, in chips.
pub const MAX_BET: u32 = 500;

/// The action vocabulary. One enumerated value per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    PlayCard,
    Bet,
    Fold,
}

impl ActionType {
    /// Parse the wire representation of an action type.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw {
            "PLAY_CARD" => Ok(ActionType::PlayCard),
            "BET" => Ok(ActionType::Bet),
            "FOLD" => Ok(ActionType::Fold),
            other => Err(DomainError::validation(
                ValidationKind::UnknownActionType,
                format!("unknown action type: {other}"),
            )),
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            ActionType::PlayCard => "PLAY_CARD",
            ActionType::Bet => "BET",
            ActionType::Fold => "FOLD",
        }
    }
}

/// Typed payload, one variant per `ActionType`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionPayload {
    PlayCard { card: Card },
    Bet { chips: u32 },
    Fold,
}

impl ActionPayload {
    pub fn action_type(&self) -> ActionType {
        match self {
            ActionPayload::PlayCard { .. } => ActionType::PlayCard,
            ActionPayload::Bet { .. } => ActionType::Bet,
            ActionPayload::Fold => ActionType::Fold,
        }
    }
}

/// One player's recorded move within a round. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundAction {
    pub player_id: i64,
    pub payload: ActionPayload,
    pub created_at: OffsetDateTime,
}

#[derive(Deserialize)]
struct PlayCardRaw {
    suit: Suit,
    rank: Rank,
}

#[derive(Deserialize)]
struct BetRaw {
    chips: u32,
}

impl RoundAction {
    /// Build a validated action from an action type and a raw payload.
    ///
    /// Pure: no I/O, no side effects. Fails with an `InvalidActionPayload`
    /// validation error naming the violated rule.
    pub fn build(kind: ActionType, raw: &Value, player_id: i64) -> Result<Self, DomainError> {
        let payload = match kind {
            ActionType::PlayCard => {
                let card: PlayCardRaw = serde_json::from_value(raw.clone()).map_err(|e| {
                    DomainError::validation(
                        ValidationKind::InvalidActionPayload,
                        format!("PLAY_CARD payload requires suit and rank: {e}"),
                    )
                })?;
                ActionPayload::PlayCard {
                    card: Card::new(card.suit, card.rank),
                }
            }
            ActionType::Bet => {
                let bet: BetRaw = serde_json::from_value(raw.clone()).map_err(|e| {
                    DomainError::validation(
                        ValidationKind::InvalidActionPayload,
                        format!("BET payload requires a chips amount: {e}"),
                    )
                })?;
                if bet.chips == 0 || bet.chips > MAX_BET {
                    return Err(DomainError::validation(
                        ValidationKind::InvalidActionPayload,
                        format!("BET chips must be in 1..={MAX_BET}, got {}", bet.chips),
                    ));
                }
                ActionPayload::Bet { chips: bet.chips }
            }
            ActionType::Fold => {
                let takes_no_fields = matches!(raw, Value::Object(map) if map.is_empty());
                if !takes_no_fields {
                    return Err(DomainError::validation(
                        ValidationKind::InvalidActionPayload,
                        "FOLD payload must be an empty object",
                    ));
                }
                ActionPayload::Fold
            }
        };

        Ok(Self {
            player_id,
            payload,
            created_at: OffsetDateTime::now_utc(),
        })
    }

    pub fn action_type(&self) -> ActionType {
        self.payload.action_type()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::errors::domain::{DomainError, ValidationKind};

    fn assert_invalid_payload(err: DomainError) {
        match err {
            DomainError::Validation(ValidationKind::InvalidActionPayload, _) => {}
            other => panic!("expected InvalidActionPayload, got {other:?}"),
        }
    }

    #[test]
    fn builds_play_card() {
        let raw = json!({"suit": "HEARTS", "rank": "QUEEN"});
        let action = RoundAction::build(ActionType::PlayCard, &raw, 7).unwrap();
        assert_eq!(action.player_id, 7);
        assert_eq!(action.action_type(), ActionType::PlayCard);
        assert_eq!(
            action.payload,
            ActionPayload::PlayCard {
                card: Card::new(Suit::Hearts, Rank::Queen)
            }
        );
    }

    #[test]
    fn play_card_missing_rank_is_invalid() {
        let raw = json!({"suit": "HEARTS"});
        let err = RoundAction::build(ActionType::PlayCard, &raw, 7).unwrap_err();
        assert_invalid_payload(err);
    }

    #[test]
    fn play_card_unknown_suit_is_invalid() {
        let raw = json!({"suit": "STARS", "rank": "QUEEN"});
        let err = RoundAction::build(ActionType::PlayCard, &raw, 7).unwrap_err();
        assert_invalid_payload(err);
    }

    #[test]
    fn builds_bet_within_range() {
        let action = RoundAction::build(ActionType::Bet, &json!({"chips": 50}), 3).unwrap();
        assert_eq!(action.payload, ActionPayload::Bet { chips: 50 });
    }

    #[test]
    fn bet_of_zero_is_invalid() {
        let err = RoundAction::build(ActionType::Bet, &json!({"chips": 0}), 3).unwrap_err();
        assert_invalid_payload(err);
    }

    #[test]
    fn bet_above_max_is_invalid() {
        let err = RoundAction::build(ActionType::Bet, &json!({"chips": 501}), 3).unwrap_err();
        assert_invalid_payload(err);
    }

    #[test]
    fn bet_negative_is_invalid() {
        let err = RoundAction::build(ActionType::Bet, &json!({"chips": -2}), 3).unwrap_err();
        assert_invalid_payload(err);
    }

    #[test]
    fn builds_fold_from_empty_object() {
        let action = RoundAction::build(ActionType::Fold, &json!({}), 9).unwrap();
        assert_eq!(action.payload, ActionPayload::Fold);
    }

    #[test]
    fn fold_with_fields_is_invalid() {
        let err = RoundAction::build(ActionType::Fold, &json!({"chips": 1}), 9).unwrap_err();
        assert_invalid_payload(err);
    }

    #[test]
    fn unknown_action_type_string_is_rejected() {
        let err = ActionType::parse("RAISE").unwrap_err();
        match err {
            DomainError::Validation(ValidationKind::UnknownActionType, detail) => {
                assert!(detail.contains("RAISE"));
            }
            other => panic!("expected UnknownActionType, got {other:?}"),
        }
    }

    #[test]
    fn action_type_round_trips_through_as_str() {
        for kind in [ActionType::PlayCard, ActionType::Bet, ActionType::Fold] {
            assert_eq!(ActionType::parse(kind.as_str()).unwrap(), kind);
        }
    }
}
