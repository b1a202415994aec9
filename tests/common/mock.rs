use notification_sync::domain::{
    entities::{Notification, NotificationId, NotificationPermission, TenantId},
    error::DomainResult,
    repositories::NotificationRepository,
    services::{SystemNotifier, ToastSink},
};

mockall::mock! {
    pub NotificationRepository {}
    #[async_trait::async_trait]
    impl NotificationRepository for NotificationRepository {
        async fn fetch_snapshot(&self, tenant_id: &TenantId) -> DomainResult<Vec<Notification>>;
        async fn mark_as_read(&self, id: &NotificationId) -> DomainResult<()>;
        async fn delete(&self, id: &NotificationId) -> DomainResult<()>;
    }
}

mockall::mock! {
    pub SystemNotifier {}
    #[async_trait::async_trait]
    impl SystemNotifier for SystemNotifier {
        async fn permission(&self) -> NotificationPermission;
        async fn request_permission(&self) -> NotificationPermission;
        async fn notify(&self, title: &str, body: &str) -> DomainResult<()>;
    }
}

mockall::mock! {
    pub ToastSink {}
    #[async_trait::async_trait]
    impl ToastSink for ToastSink {
        async fn show_toast(&self, notification: &Notification) -> DomainResult<()>;
    }
}
