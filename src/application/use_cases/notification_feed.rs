use crate::domain::{
    entities::{Notification, NotificationId},
    error::{DomainError, DomainResult},
    services::{NotificationView, SyncCoordinator},
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FeedPage {
    pub items: Vec<Notification>,
    pub total: usize,
    pub unread_count: usize,
    pub page: usize,
    pub per_page: usize,
    pub has_more: bool,
}

/// Read-side queries for the badge, the dropdown and the full page, plus the
/// user commands they issue. Every read goes through one coordinator view so
/// the surfaces always agree.
pub struct NotificationFeed {
    coordinator: Arc<SyncCoordinator>,
}

impl NotificationFeed {
    pub fn new(coordinator: Arc<SyncCoordinator>) -> Self {
        Self { coordinator }
    }

    pub fn unread_count(&self) -> usize {
        self.coordinator.unread_count()
    }

    /// Newest first, in store order.
    pub fn recent(&self, limit: usize) -> Vec<Notification> {
        self.coordinator
            .notifications()
            .into_iter()
            .take(limit)
            .collect()
    }

    pub fn unread(&self) -> Vec<Notification> {
        self.coordinator
            .notifications()
            .into_iter()
            .filter(Notification::is_unread)
            .collect()
    }

    /// `page` is 1-based.
    pub fn page(&self, page: usize, per_page: usize) -> DomainResult<FeedPage> {
        if page == 0 || per_page == 0 {
            return Err(DomainError::ValidationError(
                "page and per_page must be at least 1".to_string(),
            ));
        }

        let view = self.coordinator.view();
        let total = view.notifications.len();
        let start = (page - 1).saturating_mul(per_page);
        let items: Vec<Notification> = view
            .notifications
            .into_iter()
            .skip(start)
            .take(per_page)
            .collect();
        let has_more = start.saturating_add(items.len()) < total;

        Ok(FeedPage {
            items,
            total,
            unread_count: view.unread_count,
            page,
            per_page,
            has_more,
        })
    }

    pub fn view(&self) -> NotificationView {
        self.coordinator.view()
    }

    pub async fn mark_as_read(&self, id: &NotificationId) -> DomainResult<bool> {
        self.coordinator.mark_as_read(id).await
    }

    pub async fn delete_notification(&self, id: &NotificationId) -> DomainResult<bool> {
        self.coordinator.delete_notification(id).await
    }

    pub async fn mark_all_as_read(&self) -> DomainResult<usize> {
        self.coordinator.mark_all_as_read().await
    }

    pub async fn refresh(&self) -> DomainResult<usize> {
        self.coordinator.refresh().await
    }
}
