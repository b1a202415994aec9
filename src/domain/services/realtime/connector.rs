use crate::domain::{entities::TenantId, error::DomainResult};
use async_trait::async_trait;
use std::sync::Arc;

/// Opens per-tenant push subscriptions over a persistent connection.
#[async_trait]
pub trait PushConnector: Send + Sync {
    /// Resolves once the server has acknowledged the connection and the
    /// tenant topic is subscribed.
    async fn open(&self, tenant_id: &TenantId) -> DomainResult<Box<dyn PushSession>>;
}

/// One live subscription. Frames are raw message bodies; parsing happens in
/// the client so every connector drops malformed payloads the same way.
#[async_trait]
pub trait PushSession: Send {
    /// `None` once the peer closed the connection.
    async fn next_frame(&mut self) -> Option<DomainResult<String>>;
    async fn close(&mut self);
}

pub type DynPushConnector = Arc<dyn PushConnector>;
