pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
#[cfg(test)]
pub mod test_utils;

use application::NotificationFeed;
use domain::{
    entities::TenantId,
    error::DomainResult,
    events::{BroadcastEventPublisher, NotificationEvent},
    services::{
        DynPushConnector, DynSystemNotifier, DynToastSink, RealtimeClient, SideEffectDispatcher,
        SyncCoordinator,
    },
    DynNotificationRepository,
};
use infrastructure::{
    DesktopNotifier, EventToastSink, HttpNotificationRepository, LogToastSink,
    StompPushConnector, SyncConfig,
};
use presentation::NotificationController;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

pub const APP_NAME: &str = "notification-sync";

/// The wired subsystem: one coordinator plus the read side built on it.
pub struct NotificationSync {
    pub coordinator: Arc<SyncCoordinator>,
    pub events: Arc<BroadcastEventPublisher>,
    pub feed: Arc<NotificationFeed>,
    pub controller: Arc<NotificationController>,
}

impl NotificationSync {
    /// Production wiring for UI hosts: toasts are published as
    /// `ToastRequested` events.
    pub fn from_config(config: &SyncConfig) -> DomainResult<Self> {
        let events = Arc::new(BroadcastEventPublisher::new(config.event_buffer));
        let toast = Arc::new(EventToastSink::new(events.clone())) as DynToastSink;
        Self::assemble(config, events, toast)
    }

    /// Wiring for hosts without a UI: toasts go to the log.
    pub fn headless(config: &SyncConfig) -> DomainResult<Self> {
        let events = Arc::new(BroadcastEventPublisher::new(config.event_buffer));
        Self::assemble(config, events, Arc::new(LogToastSink))
    }

    fn assemble(
        config: &SyncConfig,
        events: Arc<BroadcastEventPublisher>,
        toast: DynToastSink,
    ) -> DomainResult<Self> {
        let repository = Arc::new(HttpNotificationRepository::new(config)?) as DynNotificationRepository;
        let connector = Arc::new(StompPushConnector::new(config)) as DynPushConnector;
        let system = Arc::new(DesktopNotifier::new(APP_NAME, config.desktop_notifications))
            as DynSystemNotifier;

        Ok(Self::with_parts(config, repository, connector, toast, system, events))
    }

    /// Wires the subsystem around caller-supplied adapters.
    pub fn with_parts(
        config: &SyncConfig,
        repository: DynNotificationRepository,
        connector: DynPushConnector,
        toast: DynToastSink,
        system: DynSystemNotifier,
        events: Arc<BroadcastEventPublisher>,
    ) -> Self {
        let realtime = Arc::new(RealtimeClient::new(connector, config.reconnect_policy()));
        let dispatcher = Arc::new(SideEffectDispatcher::new(
            toast,
            system,
            config.dispatch_dedupe_capacity,
            config.dispatch_dedupe_ttl,
        ));
        let coordinator = Arc::new(SyncCoordinator::new(
            repository,
            realtime,
            dispatcher,
            events.clone(),
            config.push_buffer,
        ));
        let feed = Arc::new(NotificationFeed::new(coordinator.clone()));
        let controller = Arc::new(NotificationController::new(feed.clone()));

        Self {
            coordinator,
            events,
            feed,
            controller,
        }
    }

    /// Deactivates the session and waits for in-flight server mutations.
    pub async fn shutdown(&self) {
        self.coordinator.deactivate().await;
        self.coordinator.settle().await;
    }
}

/// Runs a headless sync session for `tenant_id` until Ctrl-C.
pub async fn run(config: SyncConfig, tenant_id: TenantId) -> anyhow::Result<()> {
    let sync = NotificationSync::headless(&config)?;

    let mut events = sync.events.subscribe();
    let logger = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => log_event(&event),
                Err(RecvError::Lagged(skipped)) => warn!("Event log skipped {} events", skipped),
                Err(RecvError::Closed) => break,
            }
        }
    });

    info!(
        "Starting notification sync for tenant {} against {}",
        tenant_id, config.api_base_url
    );
    sync.coordinator.activate(tenant_id).await;

    let status = sync.controller.status().await;
    info!(
        "Sync is {} with {} notifications ({} unread)",
        status.phase, status.total, status.unread_count
    );

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    sync.shutdown().await;
    logger.abort();
    Ok(())
}

fn log_event(event: &NotificationEvent) {
    match event {
        NotificationEvent::SnapshotFailed { error, .. } => warn!("Snapshot failed: {}", error),
        NotificationEvent::ConnectionChanged { state, .. } => info!("Push connection {}", state),
        NotificationEvent::NotificationReceived {
            notification_id,
            unread_count,
            ..
        } => info!(
            "Received notification {} ({} unread)",
            notification_id, unread_count
        ),
        other => tracing::debug!("{:?}", other),
    }
}
