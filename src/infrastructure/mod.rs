pub mod config;
pub mod env;
pub mod repositories;
pub mod services;

pub use config::SyncConfig;
pub use repositories::HttpNotificationRepository;
pub use services::{DesktopNotifier, EventToastSink, LogToastSink, StompPushConnector};
