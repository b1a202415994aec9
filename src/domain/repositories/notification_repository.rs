use crate::domain::{
    entities::{Notification, NotificationId, TenantId},
    error::DomainResult,
};
use async_trait::async_trait;
use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

/// Server-side source of truth for a tenant's notifications.
///
/// Mutations are idempotent per record, so callers may issue them
/// concurrently and let them complete in any order.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Full list for the tenant, newest first.
    async fn fetch_snapshot(&self, tenant_id: &TenantId) -> DomainResult<Vec<Notification>>;
    async fn mark_as_read(&self, id: &NotificationId) -> DomainResult<()>;
    async fn delete(&self, id: &NotificationId) -> DomainResult<()>;
}

pub type DynNotificationRepository = Arc<dyn NotificationRepository>;
