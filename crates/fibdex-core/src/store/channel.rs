use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::debug;

use super::EventChannel;
use crate::error::StoreResult;

/// A published message as seen by subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelEvent {
    pub topic: String,
    pub payload: String,
}

/// In-process pub/sub bus.
///
/// Subscribers that fall more than `capacity` events behind lose the oldest
/// events, which is fine for at-most-once notifications.
#[derive(Clone)]
pub struct BroadcastChannel {
    tx: broadcast::Sender<ChannelEvent>,
}

impl BroadcastChannel {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Receiver for every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ChannelEvent> {
        self.tx.subscribe()
    }
}

#[async_trait]
impl EventChannel for BroadcastChannel {
    async fn publish(&self, topic: &str, payload: &str) -> StoreResult<usize> {
        let event = ChannelEvent {
            topic: topic.to_string(),
            payload: payload.to_string(),
        };
        match self.tx.send(event) {
            Ok(n) => Ok(n),
            Err(_) => {
                debug!(topic, payload, "no subscribers for event");
                Ok(0)
            }
        }
    }
}
