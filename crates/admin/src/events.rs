//! In-process catalog change notification.
//!
//! Mutations publish a [`CatalogEvent`] on the [`EventBus`]; SSE handlers
//! hold a [`Subscription`] per connection. Delivery is best-effort: a slow
//! subscriber observes [`Notification::Lagged`] and is expected to re-fetch
//! the listing, which always yields the current state.

use serde::Serialize;
use tokio::sync::broadcast;

use mensa_core::{MenuItem, MenuItemId};

/// Buffered events per subscriber before lagging kicks in.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// A change to the menu catalog.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CatalogEvent {
    Created { item: MenuItem },
    Updated { item: MenuItem },
    Deleted { id: MenuItemId },
}

impl CatalogEvent {
    /// Short event name, used as the SSE event type.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Created { .. } => "created",
            Self::Updated { .. } => "updated",
            Self::Deleted { .. } => "deleted",
        }
    }
}

/// What a subscriber receives next.
#[derive(Debug, Clone)]
pub enum Notification {
    /// A catalog change.
    Event(CatalogEvent),
    /// The subscriber fell behind and `n` events were dropped; re-fetch.
    Lagged(u64),
}

/// Broadcast bus for catalog change events.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<CatalogEvent>,
}

impl EventBus {
    /// Create a new event bus.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Publish a catalog event to all current subscribers.
    ///
    /// Publishing with no subscribers is not an error.
    pub fn publish(&self, event: CatalogEvent) {
        match self.tx.send(event) {
            Ok(receivers) => {
                tracing::debug!(receivers, "catalog event published");
            }
            Err(_) => {
                tracing::debug!("catalog event published with no subscribers");
            }
        }
    }

    /// Open a new subscription.
    ///
    /// The returned handle owns its lifecycle: dropping it cancels the
    /// subscription.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// A live subscription to catalog events.
#[derive(Debug)]
pub struct Subscription {
    rx: broadcast::Receiver<CatalogEvent>,
}

impl Subscription {
    /// Wait for the next notification.
    ///
    /// Returns `None` once the bus is closed (all senders dropped).
    pub async fn next(&mut self) -> Option<Notification> {
        match self.rx.recv().await {
            Ok(event) => Some(Notification::Event(event)),
            Err(broadcast::error::RecvError::Lagged(n)) => Some(Notification::Lagged(n)),
            Err(broadcast::error::RecvError::Closed) => None,
        }
    }
}
