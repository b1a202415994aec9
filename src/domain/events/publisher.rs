use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

use super::NotificationEvent;
use crate::domain::error::DomainResult;

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish_event(&self, event: NotificationEvent) -> DomainResult<()>;
}

pub type DynEventPublisher = Arc<dyn EventPublisher>;

#[derive(Default)]
pub struct NoopEventPublisher;

#[async_trait]
impl EventPublisher for NoopEventPublisher {
    async fn publish_event(&self, _event: NotificationEvent) -> DomainResult<()> {
        Ok(())
    }
}

/// Fans events out to every subscribed UI consumer.
///
/// Publishing never fails: with no subscribers the event is dropped, and a
/// lagging subscriber loses the oldest events rather than blocking the
/// publisher.
pub struct BroadcastEventPublisher {
    sender: broadcast::Sender<NotificationEvent>,
}

impl BroadcastEventPublisher {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[async_trait]
impl EventPublisher for BroadcastEventPublisher {
    async fn publish_event(&self, event: NotificationEvent) -> DomainResult<()> {
        if self.sender.send(event).is_err() {
            debug!("No subscribers for notification event");
        }
        Ok(())
    }
}
