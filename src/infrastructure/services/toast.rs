use crate::domain::{
    entities::Notification,
    error::DomainResult,
    events::{DynEventPublisher, NotificationEvent},
    services::ToastSink,
};
use async_trait::async_trait;
use tracing::info;

/// Hands toasts to whichever UI consumer listens for `ToastRequested`.
pub struct EventToastSink {
    publisher: DynEventPublisher,
}

impl EventToastSink {
    pub fn new(publisher: DynEventPublisher) -> Self {
        Self { publisher }
    }
}

#[async_trait]
impl ToastSink for EventToastSink {
    async fn show_toast(&self, notification: &Notification) -> DomainResult<()> {
        self.publisher
            .publish_event(NotificationEvent::toast_requested(notification))
            .await
    }
}

/// Toasts for headless hosts: one log line per notification.
#[derive(Debug, Default)]
pub struct LogToastSink;

#[async_trait]
impl ToastSink for LogToastSink {
    async fn show_toast(&self, notification: &Notification) -> DomainResult<()> {
        info!(
            id = %notification.id,
            sender = notification.sender_name.as_deref().unwrap_or("-"),
            "New notification: {}",
            notification.subject
        );
        Ok(())
    }
}
