//! src/eventbus/mod.rs
//!
//! In-process event hub with guaranteed delivery to multiple
//! subscribers via bounded MPSC queues. The dispatcher publishes here;
//! embedders subscribe instead of hooking an ambient emitter.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch, Mutex};

/// Everything the client reports about its lifecycle and dispatch
/// outcomes.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    Connected,
    Disconnected,
    Reconnecting,

    Joined {
        channel: String,
        who: String,
    },

    Timeout {
        channel: String,
        who: String,
        reason: String,
        duration_seconds: u64,
    },

    ModGranted {
        channel: String,
        who: String,
    },

    ModRevoked {
        channel: String,
        who: String,
    },

    /// Emitted for every inbound chat message, command or not.
    Message {
        channel: String,
        user: String,
        text: String,
        timestamp: DateTime<Utc>,
    },

    /// A handler finished; carries whatever result it produced.
    /// Completion order, not arrival order, decides emission order.
    CommandExecuted {
        command: String,
        channel: String,
        result: Option<String>,
    },

    /// A handler failed; the failure was contained at the dispatch
    /// boundary.
    CommandError {
        command: String,
        channel: String,
        error: String,
    },
}

/// Each subscriber gets its own `mpsc::Sender<ClientEvent>`.
///
/// - If a subscriber's buffer fills, `publish` awaits until there is
///   space (backpressure).
/// - If a subscriber dropped its receiver, sending to it just fails and
///   the event still reaches the others.
#[derive(Clone)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<mpsc::Sender<ClientEvent>>>>,
    shutdown_tx: watch::Sender<bool>,
    pub shutdown_rx: watch::Receiver<bool>,
}

const DEFAULT_BUFFER_SIZE: usize = 10000;

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            subscribers: Arc::new(Mutex::new(vec![])),
            shutdown_tx: tx,
            shutdown_rx: rx,
        }
    }

    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    pub fn is_shutdown(&self) -> bool {
        *self.shutdown_rx.borrow()
    }

    /// Returns a receiver on which events will be delivered.
    pub async fn subscribe(&self, buffer_size: Option<usize>) -> mpsc::Receiver<ClientEvent> {
        let size = buffer_size.unwrap_or(DEFAULT_BUFFER_SIZE);
        let (tx, rx) = mpsc::channel(size);
        let mut subs = self.subscribers.lock().await;
        subs.push(tx);
        rx
    }

    /// Publish an event to all subscribers.
    pub async fn publish(&self, event: ClientEvent) {
        let senders = {
            let subs = self.subscribers.lock().await;
            subs.clone()
        };
        for s in senders {
            let _ = s.send(event.clone()).await;
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{sleep, timeout, Duration};

    #[tokio::test]
    async fn all_subscribers_receive_events() {
        let bus = EventBus::new();

        let mut rx1 = bus.subscribe(Some(5)).await;
        let mut rx2 = bus.subscribe(Some(5)).await;

        bus.publish(ClientEvent::Connected).await;

        assert!(matches!(
            rx1.recv().await.expect("rx1 should get event"),
            ClientEvent::Connected
        ));
        assert!(matches!(
            rx2.recv().await.expect("rx2 should get event"),
            ClientEvent::Connected
        ));
    }

    #[tokio::test]
    async fn publish_applies_backpressure_instead_of_dropping() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe(Some(1)).await;

        bus.publish(ClientEvent::Reconnecting).await;

        // Reader drains after a delay; the second publish must wait for
        // buffer space rather than lose the event.
        let handle = tokio::spawn(async move {
            sleep(Duration::from_millis(50)).await;
            let first = rx.recv().await.expect("expected first event");
            let second = rx.recv().await.expect("expected second event");
            (first, second)
        });

        let second_publish = bus.publish(ClientEvent::Disconnected);
        let result = timeout(Duration::from_millis(500), second_publish).await;
        assert!(result.is_ok(), "publish should eventually unblock");

        let (first, second) = handle.await.unwrap();
        assert!(matches!(first, ClientEvent::Reconnecting));
        assert!(matches!(second, ClientEvent::Disconnected));
    }
}
