//! Builder for creating `AppState` instances (used in both tests and
//! production wiring).
//!
//! Without `with_db` the builder wires the in-memory adapters; with it,
//! the SeaORM ones. Finisher and notifier default to `MarkFinished` and
//! `GameChannelRegistry` and can be replaced per game.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::adapters::memory::{InMemoryPlayers, InMemoryRounds};
use crate::adapters::players_sea::SeaPlayersRepo;
use crate::adapters::rounds_sea::SeaRoundsRepo;
use crate::config::db::{DbOwner, DbProfile};
use crate::error::AppError;
use crate::infra::db::connect_db;
use crate::notify::{GameChannelRegistry, StateNotifier};
use crate::repos::players::PlayersRepo;
use crate::repos::rounds::RoundsRepo;
use crate::services::round_flow::{MarkFinished, RoundFinisher, RoundFlowService};
use crate::state::app_state::AppState;

pub struct StateBuilder {
    db_profile: Option<DbProfile>,
    repos: Option<(Arc<dyn RoundsRepo>, Arc<dyn PlayersRepo>)>,
    finisher: Option<Arc<dyn RoundFinisher>>,
    notifier: Option<Arc<dyn StateNotifier>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            db_profile: None,
            repos: None,
            finisher: None,
            notifier: None,
        }
    }

    pub fn with_db(mut self, profile: DbProfile) -> Self {
        self.db_profile = Some(profile);
        self
    }

    /// Use pre-built repositories. Tests pass shared in-memory repos here
    /// so they can seed rounds and assert on stored state.
    pub fn with_repos(
        mut self,
        rounds: Arc<dyn RoundsRepo>,
        players: Arc<dyn PlayersRepo>,
    ) -> Self {
        self.repos = Some((rounds, players));
        self
    }

    pub fn with_finisher(mut self, finisher: Arc<dyn RoundFinisher>) -> Self {
        self.finisher = Some(finisher);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn StateNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let (rounds, players, db): (
            Arc<dyn RoundsRepo>,
            Arc<dyn PlayersRepo>,
            Option<DatabaseConnection>,
        ) = match (self.repos, self.db_profile) {
            (Some((rounds, players)), None) => (rounds, players, None),
            (None, Some(profile)) => {
                let conn = connect_db(profile, DbOwner::App).await?;
                (
                    Arc::new(SeaRoundsRepo::new(conn.clone())),
                    Arc::new(SeaPlayersRepo::new(conn.clone())),
                    Some(conn),
                )
            }
            (Some(_), Some(_)) => {
                return Err(AppError::config(
                    "with_repos and with_db are mutually exclusive",
                ));
            }
            (None, None) => (
                Arc::new(InMemoryRounds::new()),
                Arc::new(InMemoryPlayers::new()),
                None,
            ),
        };

        let finisher = self
            .finisher
            .unwrap_or_else(|| Arc::new(MarkFinished::new(rounds.clone())));
        let notifier = self
            .notifier
            .unwrap_or_else(|| Arc::new(GameChannelRegistry::new()));

        let flow = Arc::new(RoundFlowService::new(rounds, players, finisher, notifier));
        Ok(AppState::new(db, flow))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
