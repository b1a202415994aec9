use super::connector::{DynPushConnector, PushSession};
use crate::domain::entities::{ConnectionState, Notification, TenantId};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_secs(3),
        }
    }
}

struct Subscription {
    tenant_id: TenantId,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

struct Inner {
    generation: u64,
    subscription: Option<Subscription>,
}

struct Shared {
    inner: Mutex<Inner>,
    state_tx: watch::Sender<ConnectionState>,
}

impl Shared {
    /// Stale subscription tasks must not overwrite the state of a newer one.
    fn publish(&self, generation: u64, state: ConnectionState) {
        let inner = self.inner.lock();
        if inner.generation == generation {
            self.state_tx.send_replace(state);
        }
    }
}

enum SessionEnd {
    Cancelled,
    SinkClosed,
    Lost(String),
}

/// Keeps at most one push subscription alive and reconnects it with a fixed
/// delay until `max_attempts` consecutive failures.
pub struct RealtimeClient {
    connector: DynPushConnector,
    policy: ReconnectPolicy,
    shared: Arc<Shared>,
}

impl RealtimeClient {
    pub fn new(connector: DynPushConnector, policy: ReconnectPolicy) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            connector,
            policy,
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    generation: 0,
                    subscription: None,
                }),
                state_tx,
            }),
        }
    }

    /// Starts delivering the tenant's pushes into `sink`.
    ///
    /// A live subscription for the same tenant is reused; one for another
    /// tenant is torn down first. A subscription that reached `FAILED` is
    /// restarted with a fresh attempt budget.
    pub fn connect(&self, tenant_id: TenantId, sink: mpsc::Sender<Notification>) {
        let mut inner = self.shared.inner.lock();

        if let Some(active) = inner.subscription.as_ref() {
            if active.tenant_id == tenant_id && !active.task.is_finished() {
                debug!("Push subscription for tenant {} already active", tenant_id);
                return;
            }
        }

        if let Some(previous) = inner.subscription.take() {
            info!("Tearing down push subscription for tenant {}", previous.tenant_id);
            previous.cancel.cancel();
        }

        inner.generation += 1;
        let generation = inner.generation;
        let cancel = CancellationToken::new();
        self.shared.state_tx.send_replace(ConnectionState::Connecting);

        let task = tokio::spawn(run_subscription(
            self.shared.clone(),
            generation,
            self.connector.clone(),
            self.policy,
            tenant_id.clone(),
            sink,
            cancel.clone(),
        ));

        inner.subscription = Some(Subscription {
            tenant_id,
            cancel,
            task,
        });
    }

    /// Cancels the subscription and any pending reconnect. Idempotent.
    pub fn disconnect(&self) {
        let mut inner = self.shared.inner.lock();
        inner.generation += 1;
        if let Some(subscription) = inner.subscription.take() {
            info!("Disconnecting push subscription for tenant {}", subscription.tenant_id);
            subscription.cancel.cancel();
        }
        self.shared.state_tx.send_replace(ConnectionState::Disconnected);
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    pub fn state(&self) -> ConnectionState {
        *self.shared.state_tx.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.shared.state_tx.subscribe()
    }

    pub fn tenant(&self) -> Option<TenantId> {
        self.shared
            .inner
            .lock()
            .subscription
            .as_ref()
            .map(|s| s.tenant_id.clone())
    }

    pub fn policy(&self) -> ReconnectPolicy {
        self.policy
    }
}

impl Drop for RealtimeClient {
    fn drop(&mut self) {
        if let Some(subscription) = self.shared.inner.lock().subscription.take() {
            subscription.cancel.cancel();
        }
    }
}

async fn run_subscription(
    shared: Arc<Shared>,
    generation: u64,
    connector: DynPushConnector,
    policy: ReconnectPolicy,
    tenant_id: TenantId,
    sink: mpsc::Sender<Notification>,
    cancel: CancellationToken,
) {
    let mut failures: u32 = 0;

    loop {
        shared.publish(generation, ConnectionState::Connecting);

        let opened = tokio::select! {
            _ = cancel.cancelled() => return,
            result = connector.open(&tenant_id) => result,
        };

        match opened {
            Ok(mut session) => {
                failures = 0;
                shared.publish(generation, ConnectionState::Connected);
                info!("Push subscription established for tenant {}", tenant_id);

                match pump_session(session.as_mut(), &sink, &cancel).await {
                    SessionEnd::Cancelled => {
                        session.close().await;
                        return;
                    }
                    SessionEnd::SinkClosed => {
                        debug!("Push receiver dropped, closing subscription for tenant {}", tenant_id);
                        session.close().await;
                        shared.publish(generation, ConnectionState::Disconnected);
                        return;
                    }
                    SessionEnd::Lost(reason) => {
                        warn!("Push connection for tenant {} lost: {}", tenant_id, reason);
                    }
                }
            }
            Err(e) => {
                warn!(
                    "Push connection attempt {} for tenant {} failed: {}",
                    failures + 1,
                    tenant_id,
                    e
                );
            }
        }

        failures += 1;
        if failures >= policy.max_attempts {
            error!(
                "Push connection for tenant {} failed after {} attempts, giving up",
                tenant_id, failures
            );
            shared.publish(generation, ConnectionState::Failed);
            return;
        }

        shared.publish(generation, ConnectionState::ReconnectScheduled);
        debug!(
            "Reconnecting tenant {} in {:?} (attempt {} of {})",
            tenant_id,
            policy.delay,
            failures + 1,
            policy.max_attempts
        );

        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(policy.delay) => {}
        }
    }
}

async fn pump_session(
    session: &mut dyn PushSession,
    sink: &mpsc::Sender<Notification>,
    cancel: &CancellationToken,
) -> SessionEnd {
    loop {
        let frame = tokio::select! {
            _ = cancel.cancelled() => return SessionEnd::Cancelled,
            frame = session.next_frame() => frame,
        };

        let body = match frame {
            None => return SessionEnd::Lost("closed by server".to_string()),
            Some(Err(e)) => return SessionEnd::Lost(e.to_string()),
            Some(Ok(body)) => body,
        };

        let notification = match serde_json::from_str::<Notification>(&body) {
            Ok(notification) => notification,
            Err(e) => {
                warn!("Dropping malformed push payload: {} - {}", e, body);
                continue;
            }
        };

        debug!("Received push notification {}", notification.id);
        tokio::select! {
            _ = cancel.cancelled() => return SessionEnd::Cancelled,
            sent = sink.send(notification) => {
                if sent.is_err() {
                    return SessionEnd::SinkClosed;
                }
            }
        }
    }
}
