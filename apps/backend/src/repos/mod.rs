pub mod players;
pub mod rounds;

pub use players::{Player, PlayersRepo};
pub use rounds::RoundsRepo;
