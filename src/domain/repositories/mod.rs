pub mod notification_repository;

pub use notification_repository::{DynNotificationRepository, NotificationRepository};

#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
