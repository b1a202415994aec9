//! OS notification surface backed by notify-rust.
//!
//! Desktop platforms have no runtime permission prompt, so "permission" here
//! is the user's opt-in from configuration: an enabled notifier starts out
//! undecided and is granted on request, a disabled one is denied for good.

use crate::domain::{
    entities::NotificationPermission, error::DomainResult, services::SystemNotifier,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{info, warn};

pub struct DesktopNotifier {
    app_name: String,
    permission: Mutex<NotificationPermission>,
}

impl DesktopNotifier {
    pub fn new(app_name: impl Into<String>, enabled: bool) -> Self {
        let permission = if enabled {
            NotificationPermission::Default
        } else {
            NotificationPermission::Denied
        };
        Self {
            app_name: app_name.into(),
            permission: Mutex::new(permission),
        }
    }
}

#[async_trait]
impl SystemNotifier for DesktopNotifier {
    async fn permission(&self) -> NotificationPermission {
        *self.permission.lock()
    }

    async fn request_permission(&self) -> NotificationPermission {
        let mut permission = self.permission.lock();
        if *permission == NotificationPermission::Default {
            *permission = NotificationPermission::Granted;
        }
        *permission
    }

    async fn notify(&self, title: &str, body: &str) -> DomainResult<()> {
        let app_name = self.app_name.clone();
        let title = title.to_string();
        let body = body.to_string();

        // show() is synchronous on some platforms; keep it off the runtime.
        tokio::task::spawn_blocking(move || {
            match notify_rust::Notification::new()
                .appname(&app_name)
                .summary(&title)
                .body(&body)
                .show()
            {
                Ok(_) => info!(%title, "desktop notification sent"),
                Err(e) => warn!(%title, error = %e, "desktop notification failed"),
            }
        });
        Ok(())
    }
}
