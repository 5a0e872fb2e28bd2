#![allow(dead_code)]

// Shared fakes and wiring for round-flow integration tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use ronda_backend::adapters::memory::{InMemoryPlayers, InMemoryRounds};
use ronda_backend::domain::Round;
use ronda_backend::errors::domain::{DomainError, InfraErrorKind};
use ronda_backend::notify::{NotifyError, StateNotifier};
use ronda_backend::repos::players::Player;
use ronda_backend::repos::rounds::RoundsRepo;
use ronda_backend::services::round_flow::{
    ActionRequest, FinishingError, MarkFinished, PlayerRef, RoundFinisher, RoundFlowService,
    RoundRef,
};
use ronda_backend::{build_state, AppState};

// Logging is auto-installed for all test binaries
#[ctor::ctor]
fn init_logging() {
    ronda_test_support::logging::init();
}

/// Finisher that counts invocations and can be told to fail. On success it
/// behaves like the production `MarkFinished`, persisting the transition.
pub struct CountingFinisher {
    calls: AtomicUsize,
    inner: MarkFinished,
    fail_with: Mutex<Option<Vec<String>>>,
}

impl CountingFinisher {
    pub fn new(rounds: Arc<dyn RoundsRepo>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            inner: MarkFinished::new(rounds),
            fail_with: Mutex::new(None),
        }
    }

    pub fn fail_with(&self, reasons: Vec<String>) {
        *self.fail_with.lock().unwrap() = Some(reasons);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RoundFinisher for CountingFinisher {
    async fn perform(&self, round: &Round) -> Result<Round, FinishingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(reasons) = self.fail_with.lock().unwrap().clone() {
            return Err(FinishingError::new(reasons));
        }
        self.inner.perform(round).await
    }
}

/// Notifier that records the notified game ids, in order.
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<i64>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<i64> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl StateNotifier for RecordingNotifier {
    async fn notify_game_changed(&self, game_id: i64) -> Result<(), NotifyError> {
        self.events.lock().unwrap().push(game_id);
        Ok(())
    }
}

/// Notifier that always fails; perform_action must shrug it off.
pub struct FailingNotifier;

#[async_trait]
impl StateNotifier for FailingNotifier {
    async fn notify_game_changed(&self, _game_id: i64) -> Result<(), NotifyError> {
        Err(NotifyError::new("transport down"))
    }
}

/// Rounds repo wrapper whose saves can be switched to fail.
pub struct FailingRounds {
    inner: Arc<InMemoryRounds>,
    fail_saves: AtomicBool,
}

impl FailingRounds {
    pub fn new(inner: Arc<InMemoryRounds>) -> Self {
        Self {
            inner,
            fail_saves: AtomicBool::new(false),
        }
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl RoundsRepo for FailingRounds {
    async fn find_by_id(&self, round_id: i64) -> Result<Option<Round>, DomainError> {
        self.inner.find_by_id(round_id).await
    }

    async fn save(&self, round: &Round) -> Result<Round, DomainError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(DomainError::infra(
                InfraErrorKind::DbUnavailable,
                "injected save failure",
            ));
        }
        self.inner.save(round).await
    }
}

/// In-memory wiring with handles to every collaborator.
pub struct Harness {
    pub rounds: Arc<InMemoryRounds>,
    pub players: Arc<InMemoryPlayers>,
    pub finisher: Arc<CountingFinisher>,
    pub notifier: Arc<RecordingNotifier>,
    pub state: AppState,
}

impl Harness {
    pub async fn new() -> Self {
        let rounds = Arc::new(InMemoryRounds::new());
        let players = Arc::new(InMemoryPlayers::new());
        let finisher = Arc::new(CountingFinisher::new(rounds.clone()));
        let notifier = Arc::new(RecordingNotifier::default());

        let state = build_state()
            .with_repos(rounds.clone(), players.clone())
            .with_finisher(finisher.clone())
            .with_notifier(notifier.clone())
            .build()
            .await
            .expect("build in-memory state");

        Self {
            rounds,
            players,
            finisher,
            notifier,
            state,
        }
    }

    pub fn flow(&self) -> Arc<RoundFlowService> {
        self.state.flow()
    }

    /// Seed a round and its seated players.
    pub fn seed_round(&self, round_id: i64, game_id: i64, seats: &[i64]) {
        for player_id in seats {
            self.players
                .insert(Player::new(*player_id, format!("player-{player_id}")));
        }
        self.rounds
            .insert(Round::new(round_id, game_id, seats.to_vec()));
    }
}

pub fn act(action_type: &str, payload: Value, round_id: i64, player_id: i64) -> ActionRequest {
    ActionRequest {
        action_type: Some(action_type.to_string()),
        payload: Some(payload),
        round: Some(RoundRef::Id(round_id)),
        player: Some(PlayerRef::Id(player_id)),
    }
}
