use crate::domain::{
    entities::{Notification, NotificationId, NotificationPermission},
    error::DomainResult,
};
use async_trait::async_trait;
use moka::future::Cache;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[cfg(test)]
use mockall::automock;

/// In-app transient alert.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ToastSink: Send + Sync {
    async fn show_toast(&self, notification: &Notification) -> DomainResult<()>;
}

/// OS-level notification surface of the host.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SystemNotifier: Send + Sync {
    async fn permission(&self) -> NotificationPermission;
    async fn request_permission(&self) -> NotificationPermission;
    async fn notify(&self, title: &str, body: &str) -> DomainResult<()>;
}

pub type DynToastSink = Arc<dyn ToastSink>;
pub type DynSystemNotifier = Arc<dyn SystemNotifier>;

/// Best-effort user alerting for freshly ingested notifications.
///
/// Alerts at most once per notification id. Failures are logged and never
/// returned to the caller.
pub struct SideEffectDispatcher {
    toast: DynToastSink,
    system: DynSystemNotifier,
    seen: Cache<NotificationId, ()>,
    permission: Mutex<Option<NotificationPermission>>,
}

impl SideEffectDispatcher {
    pub fn new(
        toast: DynToastSink,
        system: DynSystemNotifier,
        dedupe_capacity: u64,
        dedupe_ttl: Duration,
    ) -> Self {
        let seen = Cache::builder()
            .max_capacity(dedupe_capacity)
            .time_to_live(dedupe_ttl)
            .build();

        Self {
            toast,
            system,
            seen,
            permission: Mutex::new(None),
        }
    }

    /// Queries the host permission and asks for it only while undecided.
    /// A denial is remembered and never re-requested.
    pub async fn ensure_permission(&self) -> NotificationPermission {
        if let Some(known) = *self.permission.lock() {
            return known;
        }

        let current = self.system.permission().await;
        let resolved = match current {
            NotificationPermission::Default => self.system.request_permission().await,
            other => other,
        };

        info!("System notification permission: {:?}", resolved);
        *self.permission.lock() = Some(resolved);
        resolved
    }

    pub fn permission(&self) -> Option<NotificationPermission> {
        *self.permission.lock()
    }

    /// Records ids that must never alert, e.g. everything already present in
    /// a snapshot.
    pub async fn mark_seen<'a, I>(&self, ids: I)
    where
        I: IntoIterator<Item = &'a NotificationId>,
    {
        for id in ids {
            self.seen.insert(id.clone(), ()).await;
        }
    }

    /// Returns `true` when alerts were attempted, `false` for a repeat id.
    pub async fn dispatch(&self, notification: &Notification) -> bool {
        let entry = self.seen.entry(notification.id.clone()).or_insert(()).await;
        if !entry.is_fresh() {
            debug!("Skipping alerts for already seen notification {}", notification.id);
            return false;
        }

        if let Err(e) = self.toast.show_toast(notification).await {
            warn!("Toast for notification {} failed: {}", notification.id, e);
        }

        if self.permission() == Some(NotificationPermission::Granted) {
            let title = match &notification.sender_name {
                Some(sender) => format!("{}: {}", sender, notification.subject),
                None => notification.subject.clone(),
            };
            if let Err(e) = self.system.notify(&title, &notification.message).await {
                warn!(
                    "System notification for {} failed: {}",
                    notification.id, e
                );
            }
        }

        true
    }

    /// Forgets seen ids and the cached permission.
    pub fn reset(&self) {
        self.seen.invalidate_all();
        *self.permission.lock() = None;
    }
}
