use crate::common::{
    init, notification_json, test_config, Broker, MockNotificationRepository,
    MockSystemNotifier, MockToastSink,
};
use notification_sync::{
    domain::{
        entities::{ConnectionState, Notification, NotificationPermission, SyncPhase, TenantId},
        error::DomainError,
        events::BroadcastEventPublisher,
    },
    infrastructure::StompPushConnector,
    presentation::PageRequest,
    NotificationSync,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};

fn records() -> Vec<Notification> {
    ["n1", "n2", "n3"]
        .iter()
        .map(|id| serde_json::from_value(notification_json(id, "acme", false)).unwrap())
        .collect()
}

fn denied() -> MockSystemNotifier {
    let mut system = MockSystemNotifier::new();
    system
        .expect_permission()
        .returning(|| NotificationPermission::Denied);
    system.expect_notify().never();
    system
}

fn quiet_toasts() -> MockToastSink {
    let mut toast = MockToastSink::new();
    toast.expect_show_toast().returning(|_| Ok(()));
    toast
}

fn build(repository: MockNotificationRepository, broker: &Broker) -> NotificationSync {
    let config = test_config("http://unused", &broker.url);
    NotificationSync::with_parts(
        &config,
        Arc::new(repository),
        Arc::new(StompPushConnector::new(&config)),
        Arc::new(quiet_toasts()),
        Arc::new(denied()),
        Arc::new(BroadcastEventPublisher::new(16)),
    )
}

#[tokio::test]
async fn test_commands_require_an_active_tenant() {
    init();
    let broker = Broker::start().await;
    let sync = build(MockNotificationRepository::new(), &broker);
    let controller = sync.controller.clone();

    let error = assert_err!(controller.mark_as_read("n1".to_string()).await);
    assert_eq!(error.code, "NOT_ACTIVE");
    let error = assert_err!(controller.refresh().await);
    assert_eq!(error.code, "NOT_ACTIVE");

    let status = controller.status().await;
    assert_eq!(status.phase, SyncPhase::Inactive);
    assert_eq!(status.connection, ConnectionState::Disconnected);
    assert!(status.tenant_id.is_none());

    let page = assert_ok!(controller.get_notifications(None).await);
    assert!(page.notifications.is_empty());
}

#[tokio::test]
async fn test_reactivation_starts_from_a_fresh_snapshot() {
    init();
    let broker = Broker::start().await;
    let mut repository = MockNotificationRepository::new();
    repository
        .expect_fetch_snapshot()
        .withf(|tenant| tenant.as_str() == "acme")
        .times(2)
        .returning(|_| Ok(records()));
    repository.expect_mark_as_read().returning(|_| Ok(()));
    let sync = build(repository, &broker);
    let controller = sync.controller.clone();

    sync.coordinator.activate(TenantId::new("acme")).await;
    assert_ok!(controller.mark_as_read("n2".to_string()).await);
    assert_eq!(controller.get_unread_count().await, 2);

    sync.coordinator.deactivate().await;
    let status = controller.status().await;
    assert_eq!(status.total, 0);
    assert_eq!(status.unread_count, 0);

    sync.coordinator.activate(TenantId::new("acme")).await;
    assert_eq!(controller.get_unread_count().await, 3);

    let page = assert_ok!(
        controller
            .get_notifications(Some(PageRequest {
                page: Some(1),
                per_page: Some(2),
            }))
            .await
    );
    assert_eq!(page.total, 3);
    assert!(page.has_more);

    sync.shutdown().await;
}

#[tokio::test]
async fn test_refresh_error_keeps_last_known_good() {
    init();
    let broker = Broker::start().await;
    let mut repository = MockNotificationRepository::new();
    let mut calls = 0;
    repository.expect_fetch_snapshot().returning(move |_| {
        calls += 1;
        if calls == 1 {
            Ok(records())
        } else {
            Err(DomainError::ExternalServiceError("gateway timeout".to_string()))
        }
    });
    let sync = build(repository, &broker);

    sync.coordinator.activate(TenantId::new("acme")).await;
    let error = assert_err!(sync.controller.refresh().await);
    assert_eq!(error.code, "EXTERNAL_SERVICE_ERROR");

    let status = sync.controller.status().await;
    assert_eq!(status.total, 3);
    assert_eq!(status.unread_count, 3);
    assert!(status.last_error.unwrap().contains("gateway timeout"));

    sync.shutdown().await;
}
