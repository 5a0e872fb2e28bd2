//! Repository implementations: SeaORM-backed for production, in-memory
//! (DashMap) for tests and DB-less state builds.

pub mod memory;
pub mod players_sea;
pub mod rounds_sea;
