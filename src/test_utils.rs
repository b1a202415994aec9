use crate::domain::{
    entities::{Notification, NotificationId, NotificationPermission, TenantId},
    error::{DomainError, DomainResult},
    events::NoopEventPublisher,
    repositories::MockNotificationRepository,
    services::{
        MockSystemNotifier, PushConnector, PushSession, RealtimeClient, ReconnectPolicy,
        SideEffectDispatcher, SyncCoordinator, ToastSink,
    },
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

pub fn notification(id: &str, read: bool) -> Notification {
    Notification::new(id, "acme", format!("subject {}", id), format!("message {}", id))
        .with_read(read)
}

pub fn notification_json(id: &str, tenant_id: &str, read: bool) -> String {
    serde_json::json!({
        "id": id,
        "subject": format!("subject {}", id),
        "message": format!("message {}", id),
        "createdAt": "2024-05-01T12:00:00Z",
        "read": read,
        "tenantId": tenant_id,
    })
    .to_string()
}

#[derive(Default)]
struct FakeState {
    current: Option<mpsc::UnboundedSender<String>>,
    fail_all: bool,
    fail_next: usize,
    opened: Vec<TenantId>,
    closes: usize,
}

/// In-memory push server. Every `open` is recorded, including refused ones.
#[derive(Default)]
pub struct FakeConnector {
    state: Arc<Mutex<FakeState>>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers a raw frame body to the most recently opened session.
    pub fn push(&self, body: String) {
        if let Some(tx) = self.state.lock().current.as_ref() {
            let _ = tx.send(body);
        }
    }

    pub fn drop_connection(&self) {
        self.state.lock().current = None;
    }

    pub fn fail_all(&self) {
        self.state.lock().fail_all = true;
    }

    pub fn fail_next(&self, count: usize) {
        self.state.lock().fail_next = count;
    }

    pub fn open_count(&self) -> usize {
        self.state.lock().opened.len()
    }

    pub fn opened_tenants(&self) -> Vec<TenantId> {
        self.state.lock().opened.clone()
    }

    pub fn close_count(&self) -> usize {
        self.state.lock().closes
    }
}

#[async_trait]
impl PushConnector for FakeConnector {
    async fn open(&self, tenant_id: &TenantId) -> DomainResult<Box<dyn PushSession>> {
        let mut state = self.state.lock();
        state.opened.push(tenant_id.clone());

        if state.fail_all {
            return Err(DomainError::TransportError("connection refused".to_string()));
        }
        if state.fail_next > 0 {
            state.fail_next -= 1;
            return Err(DomainError::TransportError("connection refused".to_string()));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        state.current = Some(tx);
        Ok(Box::new(FakeSession {
            rx,
            state: self.state.clone(),
        }))
    }
}

struct FakeSession {
    rx: mpsc::UnboundedReceiver<String>,
    state: Arc<Mutex<FakeState>>,
}

#[async_trait]
impl PushSession for FakeSession {
    async fn next_frame(&mut self) -> Option<DomainResult<String>> {
        self.rx.recv().await.map(Ok)
    }

    async fn close(&mut self) {
        self.state.lock().closes += 1;
    }
}

#[derive(Default)]
pub struct RecordingToastSink {
    shown: Mutex<Vec<NotificationId>>,
}

impl RecordingToastSink {
    pub fn count(&self) -> usize {
        self.shown.lock().len()
    }

    pub fn ids(&self) -> Vec<NotificationId> {
        self.shown.lock().clone()
    }
}

#[async_trait]
impl ToastSink for RecordingToastSink {
    async fn show_toast(&self, notification: &Notification) -> DomainResult<()> {
        self.shown.lock().push(notification.id.clone());
        Ok(())
    }
}

/// Coordinator already activated for tenant "acme" on top of `repository`,
/// with an in-memory push server and system notifications denied.
pub async fn active_coordinator(repository: MockNotificationRepository) -> Arc<SyncCoordinator> {
    let mut system = MockSystemNotifier::new();
    system
        .expect_permission()
        .returning(|| NotificationPermission::Denied);

    let coordinator = Arc::new(SyncCoordinator::new(
        Arc::new(repository),
        Arc::new(RealtimeClient::new(
            Arc::new(FakeConnector::new()),
            ReconnectPolicy::default(),
        )),
        Arc::new(SideEffectDispatcher::new(
            Arc::new(RecordingToastSink::default()),
            Arc::new(system),
            100,
            Duration::from_secs(60),
        )),
        Arc::new(NoopEventPublisher),
        8,
    ));
    coordinator.activate(TenantId::new("acme")).await;
    coordinator
}

/// Repository serving `records` as the snapshot and accepting every mutation.
pub fn serving(records: Vec<Notification>) -> MockNotificationRepository {
    let mut repository = MockNotificationRepository::new();
    repository
        .expect_fetch_snapshot()
        .returning(move |_| Ok(records.clone()));
    repository.expect_mark_as_read().returning(|_| Ok(()));
    repository.expect_delete().returning(|_| Ok(()));
    repository
}
