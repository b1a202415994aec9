pub mod http_notification_repository;

pub use http_notification_repository::HttpNotificationRepository;
