//! State-change notification boundary.
//!
//! The round-flow service reports "this game's state changed" through the
//! `StateNotifier` capability and nothing else; delivering snapshots to
//! connected clients is the transport layer's job. `GameChannelRegistry`
//! is the in-process implementation: per-game subscriber channels keyed by
//! a token, so an upstream session handler can subscribe while it holds a
//! connection and drop out when it closes.

use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

#[derive(Debug, Error)]
#[error("state notification failed: {detail}")]
pub struct NotifyError {
    pub detail: String,
}

impl NotifyError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Fire-and-forget from the round flow's perspective: failures are logged
/// by the caller, never escalated into an operation failure.
#[async_trait]
pub trait StateNotifier: Send + Sync {
    async fn notify_game_changed(&self, game_id: i64) -> Result<(), NotifyError>;
}

/// Event delivered to subscribers of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameChanged {
    pub game_id: i64,
}

#[derive(Default)]
pub struct GameChannelRegistry {
    channels: DashMap<i64, DashMap<Uuid, mpsc::UnboundedSender<GameChanged>>>,
}

impl GameChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a game's change events. The token identifies the
    /// subscription for `unsubscribe`.
    pub fn subscribe(&self, game_id: i64) -> (Uuid, mpsc::UnboundedReceiver<GameChanged>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let token = Uuid::new_v4();
        let entry = self.channels.entry(game_id).or_default();
        entry.insert(token, tx);
        (token, rx)
    }

    pub fn unsubscribe(&self, game_id: i64, token: Uuid) {
        if let Some(entry) = self.channels.get(&game_id) {
            entry.remove(&token);
            if entry.is_empty() {
                drop(entry);
                self.channels.remove_if(&game_id, |_, subs| subs.is_empty());
            }
        }
    }

    fn broadcast(&self, event: GameChanged) {
        if let Some(entry) = self.channels.get(&event.game_id) {
            // A failed send only means the subscriber is gone; its token
            // is cleaned up by unsubscribe.
            for sub in entry.iter() {
                let _ = sub.value().send(event);
            }
        }
    }
}

#[async_trait]
impl StateNotifier for GameChannelRegistry {
    async fn notify_game_changed(&self, game_id: i64) -> Result<(), NotifyError> {
        self.broadcast(GameChanged { game_id });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_game_events() {
        let registry = GameChannelRegistry::new();
        let (_token, mut rx) = registry.subscribe(7);

        registry.notify_game_changed(7).await.unwrap();
        assert_eq!(rx.recv().await, Some(GameChanged { game_id: 7 }));
    }

    #[tokio::test]
    async fn events_stay_within_their_game() {
        let registry = GameChannelRegistry::new();
        let (_a, mut rx_a) = registry.subscribe(1);
        let (_b, mut rx_b) = registry.subscribe(2);

        registry.notify_game_changed(1).await.unwrap();
        assert_eq!(rx_a.recv().await, Some(GameChanged { game_id: 1 }));
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn unsubscribed_token_receives_nothing() {
        let registry = GameChannelRegistry::new();
        let (token, mut rx) = registry.subscribe(3);
        registry.unsubscribe(3, token);

        registry.notify_game_changed(3).await.unwrap();
        assert!(rx.recv().await.is_none());
    }
}
