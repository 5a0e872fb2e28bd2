//! SeaORM entities for the round-flow storage schema.

pub mod game_players;
pub mod game_rounds;
pub mod players;
pub mod round_actions;
