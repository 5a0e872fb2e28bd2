#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod entities;
pub mod error;
pub mod errors;
pub mod infra;
pub mod notify;
pub mod repos;
pub mod services;
pub mod state;
pub mod telemetry;

// Re-exports for public API
pub use config::db::{db_url, DbOwner, DbProfile};
pub use error::AppError;
pub use infra::db::connect_db;
pub use infra::state::build_state;
pub use services::round_flow::{
    ActError, ActionRequest, PlayerRef, RoundFlowService, RoundRef,
};
pub use state::app_state::AppState;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    ronda_test_support::logging::init();
}
