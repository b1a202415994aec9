pub mod notification_events;
pub mod publisher;

pub use notification_events::NotificationEvent;
pub use publisher::{BroadcastEventPublisher, DynEventPublisher, EventPublisher, NoopEventPublisher};
