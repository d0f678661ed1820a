//! Player event subscriptions.
//!
//! Observers register typed callbacks and get a [`SubscriptionId`] back to
//! remove them later. Every event is also broadcast on a tokio channel for
//! consumers that prefer a stream.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Readiness of the player's current item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Unknown,
    ReadyToPlay,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PlayerEvent {
    RateChanged { old: f32, new: f32 },
    StatusChanged { status: ItemStatus },
    ReachedEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type RateCallback = Arc<dyn Fn(f32, f32) + Send + Sync>;
type StatusCallback = Arc<dyn Fn(ItemStatus) + Send + Sync>;
type EndCallback = Arc<dyn Fn() + Send + Sync>;

#[derive(Clone)]
enum Handler {
    Rate(RateCallback),
    Status(StatusCallback),
    End(EndCallback),
}

pub struct PlayerEvents {
    next_id: AtomicU64,
    handlers: RwLock<Vec<(SubscriptionId, Handler)>>,
    event_tx: broadcast::Sender<PlayerEvent>,
}

impl Default for PlayerEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PlayerEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerEvents")
            .field("subscriptions", &self.subscription_count())
            .finish()
    }
}

impl PlayerEvents {
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self {
            next_id: AtomicU64::new(1),
            handlers: RwLock::new(Vec::new()),
            event_tx,
        }
    }

    /// Called with `(old, new)` whenever the playback rate changes.
    pub fn on_rate_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(f32, f32) + Send + Sync + 'static,
    {
        self.register(Handler::Rate(Arc::new(callback)))
    }

    pub fn on_status_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(ItemStatus) + Send + Sync + 'static,
    {
        self.register(Handler::Status(Arc::new(callback)))
    }

    /// Called when playback reaches the end of the current item.
    pub fn on_reached_end<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.register(Handler::End(Arc::new(callback)))
    }

    /// Remove a callback. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.write();
        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        handlers.len() != before
    }

    pub fn subscription_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Stream of every event emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.event_tx.subscribe()
    }

    /// Deliver `event` to matching callbacks and broadcast subscribers.
    ///
    /// Callbacks run after the handler lock is released, so they may
    /// subscribe or unsubscribe.
    pub fn emit(&self, event: PlayerEvent) {
        let handlers: Vec<Handler> = self
            .handlers
            .read()
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();

        for handler in handlers {
            match (&handler, &event) {
                (Handler::Rate(callback), PlayerEvent::RateChanged { old, new }) => {
                    callback(*old, *new)
                }
                (Handler::Status(callback), PlayerEvent::StatusChanged { status }) => {
                    callback(*status)
                }
                (Handler::End(callback), PlayerEvent::ReachedEnd) => callback(),
                _ => {}
            }
        }

        if self.event_tx.send(event).is_err() {
            tracing::trace!("No stream subscribers for player event");
        }
    }

    fn register(&self, handler: Handler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers.write().push((id, handler));
        id
    }
}
