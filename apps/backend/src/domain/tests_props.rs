//! Property tests for round eligibility and completion.

use proptest::prelude::*;
use serde_json::json;

use crate::domain::{ActionType, Round, RoundAction};

fn fold(player_id: i64) -> RoundAction {
    RoundAction::build(ActionType::Fold, &json!({}), player_id).unwrap()
}

fn shuffled_players() -> impl Strategy<Value = Vec<i64>> {
    (2usize..=8).prop_flat_map(|n| Just((0..n as i64).collect::<Vec<_>>()).prop_shuffle())
}

proptest! {
    /// After N eligible players act in any order, the round holds exactly N
    /// actions, each player appears once, and the round is complete.
    #[test]
    fn each_player_acts_exactly_once(order in shuffled_players()) {
        let mut seats = order.clone();
        seats.sort_unstable();
        let mut round = Round::new(1, 100, seats.clone());

        for (i, player) in order.iter().enumerate() {
            prop_assert!(round.can_player_act(*player));
            round.record_action(fold(*player)).unwrap();
            prop_assert_eq!(round.actions.len(), i + 1);
            prop_assert!(!round.can_player_act(*player));
        }

        prop_assert!(round.everybody_played());
        for player in &seats {
            prop_assert_eq!(
                round.actions.iter().filter(|a| a.player_id == *player).count(),
                1
            );
        }
    }

    /// Eligibility never comes back: once a player has acted, every later
    /// state of the round still reports them ineligible.
    #[test]
    fn eligibility_is_monotonic(order in shuffled_players()) {
        let mut seats = order.clone();
        seats.sort_unstable();
        let mut round = Round::new(1, 100, seats);
        let first = order[0];

        round.record_action(fold(first)).unwrap();
        for player in order.iter().skip(1) {
            prop_assert!(!round.can_player_act(first));
            round.record_action(fold(*player)).unwrap();
        }
        prop_assert!(!round.can_player_act(first));
    }

    /// Completion is reached only when the last expected player acts.
    #[test]
    fn completion_requires_all_players(order in shuffled_players()) {
        let mut seats = order.clone();
        seats.sort_unstable();
        let mut round = Round::new(1, 100, seats);

        for player in order.iter().take(order.len() - 1) {
            round.record_action(fold(*player)).unwrap();
            prop_assert!(!round.everybody_played());
        }
        round.record_action(fold(order[order.len() - 1])).unwrap();
        prop_assert!(round.everybody_played());
    }
}
