//! Pure domain logic for the Ronda round flow.
//!
//! Nothing in this module performs I/O. Repositories hand `Round` values
//! in and out; the round-flow service drives mutation through
//! `Round::record_action` only.

mod actions;
mod cards;
mod round;

pub use actions::{ActionPayload, ActionType, RoundAction, MAX_BET};
pub use cards::{Card, Rank, Suit};
pub use round::{Round, RoundStatus};

#[cfg(test)]
mod tests_props;
