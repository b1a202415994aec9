pub mod entities;
pub mod error;
pub mod events;
pub mod repositories;
pub mod services;

pub use entities::{
    ConnectionState, Notification, NotificationId, NotificationPermission, SyncPhase, TenantId,
};

pub use error::{DomainError, DomainResult};

pub use events::{BroadcastEventPublisher, DynEventPublisher, EventPublisher, NotificationEvent};

pub use repositories::{DynNotificationRepository, NotificationRepository};

pub use services::{
    NotificationStore, NotificationView, RealtimeClient, ReconnectPolicy, SideEffectDispatcher,
    SyncCoordinator,
};
