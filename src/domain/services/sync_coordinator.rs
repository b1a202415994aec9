//! Tenant-scoped owner of the notification store.
//!
//! Activation loads a snapshot, then subscribes to pushes. A push that lands
//! while a later snapshot (manual refresh) is in flight may be overwritten by
//! that snapshot if the server had not included it yet. The window closes on
//! the next refresh or on a repeat push, since ingest is idempotent per id.
//! There is no cursor-based reconciliation.

use super::notification_store::NotificationStore;
use super::realtime::RealtimeClient;
use super::side_effects::SideEffectDispatcher;
use crate::domain::{
    entities::{ConnectionState, Notification, NotificationId, SyncPhase, TenantId},
    error::{DomainError, DomainResult},
    events::{DynEventPublisher, NotificationEvent},
    repositories::DynNotificationRepository,
};
use parking_lot::Mutex;
use serde::Serialize;
use std::future::Future;
use std::sync::{Arc, Weak};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

/// Everything a consumer renders, captured under one lock.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationView {
    pub tenant_id: Option<TenantId>,
    pub phase: SyncPhase,
    pub connection: ConnectionState,
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
    pub last_error: Option<String>,
}

struct Session {
    tenant_id: Option<TenantId>,
    phase: SyncPhase,
    generation: u64,
    last_error: Option<String>,
    tasks: Vec<JoinHandle<()>>,
}

pub struct SyncCoordinator {
    repository: DynNotificationRepository,
    realtime: Arc<RealtimeClient>,
    dispatcher: Arc<SideEffectDispatcher>,
    publisher: DynEventPublisher,
    // Lock order: session, then store or the realtime client.
    session: Mutex<Session>,
    store: Mutex<NotificationStore>,
    mutations: TaskTracker,
    push_buffer: usize,
}

impl SyncCoordinator {
    pub fn new(
        repository: DynNotificationRepository,
        realtime: Arc<RealtimeClient>,
        dispatcher: Arc<SideEffectDispatcher>,
        publisher: DynEventPublisher,
        push_buffer: usize,
    ) -> Self {
        Self {
            repository,
            realtime,
            dispatcher,
            publisher,
            session: Mutex::new(Session {
                tenant_id: None,
                phase: SyncPhase::Inactive,
                generation: 0,
                last_error: None,
                tasks: Vec::new(),
            }),
            store: Mutex::new(NotificationStore::new()),
            mutations: TaskTracker::new(),
            push_buffer: push_buffer.max(1),
        }
    }

    /// Binds the coordinator to a tenant: snapshot first, then the push
    /// subscription. A no-op when that tenant is already active; another
    /// active tenant is deactivated first.
    ///
    /// A failed snapshot still leaves the session `LIVE` with `last_error`
    /// set, so pushes flow and a manual refresh can retry.
    pub async fn activate(self: &Arc<Self>, tenant_id: TenantId) {
        let current = {
            let session = self.session.lock();
            (session.tenant_id.clone(), session.phase)
        };
        match current {
            (Some(active), phase) if active == tenant_id && phase != SyncPhase::Inactive => {
                debug!("Tenant {} already active", tenant_id);
                return;
            }
            (Some(_), _) => self.deactivate().await,
            (None, _) => {}
        }

        let generation = {
            let mut session = self.session.lock();
            session.generation += 1;
            session.tenant_id = Some(tenant_id.clone());
            session.phase = SyncPhase::Syncing;
            session.last_error = None;
            self.store.lock().clear();

            let dispatcher = self.dispatcher.clone();
            session.tasks.push(tokio::spawn(async move {
                dispatcher.ensure_permission().await;
            }));
            session.generation
        };

        info!("Activating notification sync for tenant {}", tenant_id);
        self.publish(NotificationEvent::tenant_activated(tenant_id.clone()))
            .await;

        // Failure is already recorded in `last_error` and published.
        let _ = self.load_snapshot(&tenant_id, generation).await;

        // Phase change and connect share one session lock; `deactivate`
        // observes both or neither.
        let mut session = self.session.lock();
        if session.generation != generation {
            debug!("Activation of tenant {} superseded", tenant_id);
            return;
        }
        session.phase = SyncPhase::Live;

        let (tx, rx) = mpsc::channel(self.push_buffer);
        let state_rx = self.realtime.subscribe_state();
        self.realtime.connect(tenant_id.clone(), tx);

        session
            .tasks
            .push(tokio::spawn(pump_pushes(Arc::downgrade(self), rx)));
        session.tasks.push(tokio::spawn(watch_connection(
            self.publisher.clone(),
            tenant_id,
            state_rx,
        )));
    }

    /// Tears down the subscription and empties the store. Idempotent.
    pub async fn deactivate(&self) {
        let (tenant_id, tasks) = {
            let mut session = self.session.lock();
            session.generation += 1;
            session.phase = SyncPhase::Inactive;
            session.last_error = None;
            self.store.lock().clear();
            (session.tenant_id.take(), std::mem::take(&mut session.tasks))
        };

        self.realtime.disconnect();
        for task in tasks {
            task.abort();
        }
        self.dispatcher.reset();

        if let Some(tenant_id) = tenant_id {
            info!("Deactivated notification sync for tenant {}", tenant_id);
            self.publish(NotificationEvent::tenant_deactivated(tenant_id))
                .await;
        }
    }

    /// Re-runs the snapshot fetch only; the push subscription is untouched.
    pub async fn refresh(&self) -> DomainResult<usize> {
        let (tenant_id, generation) = {
            let session = self.session.lock();
            match (&session.tenant_id, session.phase) {
                (Some(tenant_id), phase) if phase != SyncPhase::Inactive => {
                    (tenant_id.clone(), session.generation)
                }
                _ => return Err(DomainError::NotActive),
            }
        };

        info!("Refreshing notifications for tenant {}", tenant_id);
        self.load_snapshot(&tenant_id, generation).await
    }

    /// Ingests one pushed record and alerts the user about it.
    ///
    /// Returns `true` if the record was new. Duplicates are not alerted
    /// again and records for another tenant are dropped.
    pub async fn handle_push(&self, notification: Notification) -> bool {
        let (inserted, unread_count) = {
            let session = self.session.lock();
            match &session.tenant_id {
                Some(active) if *active == notification.tenant_id => {}
                Some(active) => {
                    warn!(
                        "Dropping push {} for tenant {} while {} is active",
                        notification.id, notification.tenant_id, active
                    );
                    return false;
                }
                None => {
                    debug!("Dropping push {} with no active tenant", notification.id);
                    return false;
                }
            }
            let mut store = self.store.lock();
            let inserted = store.ingest(notification.clone());
            (inserted, store.unread_count())
        };

        if !inserted {
            debug!("Ignoring duplicate push {}", notification.id);
            return false;
        }

        self.publish(NotificationEvent::notification_received(
            notification.id.clone(),
            unread_count,
        ))
        .await;
        self.dispatcher.dispatch(&notification).await;
        true
    }

    /// Returns `true` if the record was unread locally. The server call is
    /// issued in the background and never rolled back.
    pub async fn mark_as_read(&self, id: &NotificationId) -> DomainResult<bool> {
        let (changed, unread_count) = self.with_store(|store| {
            let changed = store.mark_read(id);
            (changed, store.unread_count())
        })?;

        if changed {
            self.publish(NotificationEvent::notification_read(id.clone(), unread_count))
                .await;
        }
        self.spawn_mutation("mark as read", id.clone(), |repository, id| async move {
            repository.mark_as_read(&id).await
        });
        Ok(changed)
    }

    pub async fn delete_notification(&self, id: &NotificationId) -> DomainResult<bool> {
        let (removed, unread_count) = self.with_store(|store| {
            let removed = store.delete_notification(id).is_some();
            (removed, store.unread_count())
        })?;

        if removed {
            self.publish(NotificationEvent::notification_deleted(id.clone(), unread_count))
                .await;
        }
        self.spawn_mutation("delete", id.clone(), |repository, id| async move {
            repository.delete(&id).await
        });
        Ok(removed)
    }

    /// Returns how many records changed. Each one is marked read on the
    /// server individually.
    pub async fn mark_all_as_read(&self) -> DomainResult<usize> {
        let tenant_id = self.tenant().ok_or(DomainError::NotActive)?;
        let changed = self.with_store(|store| store.mark_all_read())?;

        self.publish(NotificationEvent::all_notifications_read(
            tenant_id,
            changed.len(),
        ))
        .await;

        let count = changed.len();
        for id in changed {
            self.spawn_mutation("mark as read", id, |repository, id| async move {
                repository.mark_as_read(&id).await
            });
        }
        Ok(count)
    }

    pub fn view(&self) -> NotificationView {
        let session = self.session.lock();
        let store = self.store.lock();
        NotificationView {
            tenant_id: session.tenant_id.clone(),
            phase: session.phase,
            connection: self.realtime.state(),
            notifications: store.items().to_vec(),
            unread_count: store.unread_count(),
            last_error: session.last_error.clone(),
        }
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.store.lock().items().to_vec()
    }

    pub fn unread_count(&self) -> usize {
        self.store.lock().unread_count()
    }

    pub fn phase(&self) -> SyncPhase {
        self.session.lock().phase
    }

    pub fn tenant(&self) -> Option<TenantId> {
        self.session.lock().tenant_id.clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.session.lock().last_error.clone()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.realtime.state()
    }

    /// Waits for every in-flight server mutation to finish.
    pub async fn settle(&self) {
        self.mutations.close();
        self.mutations.wait().await;
        self.mutations.reopen();
    }

    async fn load_snapshot(&self, tenant_id: &TenantId, generation: u64) -> DomainResult<usize> {
        match self.repository.fetch_snapshot(tenant_id).await {
            Ok(records) => {
                let (total, unread_count, ids) = {
                    let session = self.session.lock();
                    if session.generation != generation {
                        info!("Discarding stale snapshot for tenant {}", tenant_id);
                        return Err(DomainError::ConflictError(format!(
                            "Tenant session for {} changed during fetch",
                            tenant_id
                        )));
                    }
                    let mut store = self.store.lock();
                    store.replace_snapshot(records);
                    let ids: Vec<NotificationId> = store.ids().cloned().collect();
                    (store.len(), store.unread_count(), ids)
                };
                self.session.lock().last_error = None;

                self.dispatcher.mark_seen(ids.iter()).await;
                info!(
                    "Loaded {} notifications ({} unread) for tenant {}",
                    total, unread_count, tenant_id
                );
                self.publish(NotificationEvent::snapshot_loaded(
                    tenant_id.clone(),
                    total,
                    unread_count,
                ))
                .await;
                Ok(total)
            }
            Err(e) => {
                error!("Failed to load notifications for tenant {}: {}", tenant_id, e);
                {
                    let mut session = self.session.lock();
                    if session.generation == generation {
                        session.last_error = Some(format!("Failed to load notifications: {}", e));
                    }
                }
                self.publish(NotificationEvent::snapshot_failed(
                    tenant_id.clone(),
                    e.to_string(),
                ))
                .await;
                Err(e)
            }
        }
    }

    fn with_store<T>(&self, f: impl FnOnce(&mut NotificationStore) -> T) -> DomainResult<T> {
        let session = self.session.lock();
        if session.tenant_id.is_none() {
            return Err(DomainError::NotActive);
        }
        let mut store = self.store.lock();
        Ok(f(&mut store))
    }

    fn spawn_mutation<F, Fut>(&self, action: &'static str, id: NotificationId, call: F)
    where
        F: FnOnce(DynNotificationRepository, NotificationId) -> Fut,
        Fut: Future<Output = DomainResult<()>> + Send + 'static,
    {
        let request = call(self.repository.clone(), id.clone());
        self.mutations.spawn(async move {
            match request.await {
                Ok(()) => debug!("Server confirmed {} for notification {}", action, id),
                Err(e) => error!("Failed to {} notification {}: {}", action, id, e),
            }
        });
    }

    async fn publish(&self, event: NotificationEvent) {
        if let Err(e) = self.publisher.publish_event(event).await {
            warn!("Failed to publish notification event: {}", e);
        }
    }
}

async fn pump_pushes(coordinator: Weak<SyncCoordinator>, mut rx: mpsc::Receiver<Notification>) {
    while let Some(notification) = rx.recv().await {
        let Some(coordinator) = coordinator.upgrade() else {
            break;
        };
        coordinator.handle_push(notification).await;
    }
}

async fn watch_connection(
    publisher: DynEventPublisher,
    tenant_id: TenantId,
    mut state_rx: tokio::sync::watch::Receiver<ConnectionState>,
) {
    while state_rx.changed().await.is_ok() {
        let state = *state_rx.borrow_and_update();
        if state == ConnectionState::Failed {
            warn!(
                "Push updates for tenant {} stopped; notifications may be stale until refreshed",
                tenant_id
            );
        }
        let event = NotificationEvent::connection_changed(tenant_id.clone(), state);
        if let Err(e) = publisher.publish_event(event).await {
            warn!("Failed to publish connection event: {}", e);
        }
    }
}
