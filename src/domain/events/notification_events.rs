use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{ConnectionState, Notification, NotificationId, TenantId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum NotificationEvent {
    TenantActivated {
        tenant_id: TenantId,
        activated_at: DateTime<Utc>,
    },
    SnapshotLoaded {
        tenant_id: TenantId,
        total: usize,
        unread_count: usize,
        loaded_at: DateTime<Utc>,
    },
    SnapshotFailed {
        tenant_id: TenantId,
        error: String,
        failed_at: DateTime<Utc>,
    },
    NotificationReceived {
        notification_id: NotificationId,
        unread_count: usize,
        received_at: DateTime<Utc>,
    },
    NotificationRead {
        notification_id: NotificationId,
        unread_count: usize,
        read_at: DateTime<Utc>,
    },
    NotificationDeleted {
        notification_id: NotificationId,
        unread_count: usize,
        deleted_at: DateTime<Utc>,
    },
    AllNotificationsRead {
        tenant_id: TenantId,
        marked: usize,
        read_at: DateTime<Utc>,
    },
    ConnectionChanged {
        tenant_id: TenantId,
        state: ConnectionState,
        changed_at: DateTime<Utc>,
    },
    ToastRequested {
        notification_id: NotificationId,
        subject: String,
        message: String,
    },
    TenantDeactivated {
        tenant_id: TenantId,
        deactivated_at: DateTime<Utc>,
    },
}

impl NotificationEvent {
    pub fn tenant_activated(tenant_id: TenantId) -> Self {
        Self::TenantActivated {
            tenant_id,
            activated_at: Utc::now(),
        }
    }

    pub fn snapshot_loaded(tenant_id: TenantId, total: usize, unread_count: usize) -> Self {
        Self::SnapshotLoaded {
            tenant_id,
            total,
            unread_count,
            loaded_at: Utc::now(),
        }
    }

    pub fn snapshot_failed(tenant_id: TenantId, error: String) -> Self {
        Self::SnapshotFailed {
            tenant_id,
            error,
            failed_at: Utc::now(),
        }
    }

    pub fn notification_received(notification_id: NotificationId, unread_count: usize) -> Self {
        Self::NotificationReceived {
            notification_id,
            unread_count,
            received_at: Utc::now(),
        }
    }

    pub fn notification_read(notification_id: NotificationId, unread_count: usize) -> Self {
        Self::NotificationRead {
            notification_id,
            unread_count,
            read_at: Utc::now(),
        }
    }

    pub fn notification_deleted(notification_id: NotificationId, unread_count: usize) -> Self {
        Self::NotificationDeleted {
            notification_id,
            unread_count,
            deleted_at: Utc::now(),
        }
    }

    pub fn all_notifications_read(tenant_id: TenantId, marked: usize) -> Self {
        Self::AllNotificationsRead {
            tenant_id,
            marked,
            read_at: Utc::now(),
        }
    }

    pub fn connection_changed(tenant_id: TenantId, state: ConnectionState) -> Self {
        Self::ConnectionChanged {
            tenant_id,
            state,
            changed_at: Utc::now(),
        }
    }

    pub fn toast_requested(notification: &Notification) -> Self {
        Self::ToastRequested {
            notification_id: notification.id.clone(),
            subject: notification.subject.clone(),
            message: notification.message.clone(),
        }
    }

    pub fn tenant_deactivated(tenant_id: TenantId) -> Self {
        Self::TenantDeactivated {
            tenant_id,
            deactivated_at: Utc::now(),
        }
    }
}
