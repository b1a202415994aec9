use crate::{
    application::NotificationFeed,
    domain::entities::NotificationId,
    presentation::{
        dtos::{
            NotificationError, NotificationListResponse, NotificationResponse, PageRequest,
            SyncStatusResponse, ValidationError,
        },
        middleware::validate_command,
    },
};
use std::sync::Arc;
use validator::Validate;

pub struct NotificationController {
    feed: Arc<NotificationFeed>,
}

impl NotificationController {
    pub fn new(feed: Arc<NotificationFeed>) -> Self {
        Self { feed }
    }

    pub async fn get_notifications(
        &self,
        request: Option<PageRequest>,
    ) -> Result<NotificationListResponse, NotificationError> {
        let request = request.unwrap_or_default();
        request.validate().map_err(|e| NotificationError {
            code: "VALIDATION_ERROR".to_string(),
            message: "Invalid page request".to_string(),
            details: vec![e.to_string()],
        })?;

        let page = self
            .feed
            .page(request.page(), request.per_page())
            .map_err(NotificationError::from)?;
        Ok(page.into())
    }

    /// Same as `get_notifications`, for callers that hold the raw JSON body.
    pub async fn get_notifications_json(
        &self,
        request_json: &str,
    ) -> Result<NotificationListResponse, ValidationError> {
        validate_command::<PageRequest, _, _, _, NotificationError>(
            request_json,
            |request| async move { self.get_notifications(Some(request)).await },
        )
        .await
    }

    pub async fn get_recent(&self, limit: usize) -> Vec<NotificationResponse> {
        self.feed.recent(limit).into_iter().map(Into::into).collect()
    }

    pub async fn get_unread_count(&self) -> usize {
        self.feed.unread_count()
    }

    pub async fn mark_as_read(&self, id: String) -> Result<bool, NotificationError> {
        let id = parse_id(&id)?;
        self.feed
            .mark_as_read(&id)
            .await
            .map_err(NotificationError::from)
    }

    pub async fn delete_notification(&self, id: String) -> Result<bool, NotificationError> {
        let id = parse_id(&id)?;
        self.feed
            .delete_notification(&id)
            .await
            .map_err(NotificationError::from)
    }

    pub async fn mark_all_as_read(&self) -> Result<usize, NotificationError> {
        self.feed
            .mark_all_as_read()
            .await
            .map_err(NotificationError::from)
    }

    pub async fn refresh(&self) -> Result<usize, NotificationError> {
        self.feed.refresh().await.map_err(NotificationError::from)
    }

    pub async fn status(&self) -> SyncStatusResponse {
        self.feed.view().into()
    }
}

fn parse_id(raw: &str) -> Result<NotificationId, NotificationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(NotificationError::invalid_id(raw));
    }
    Ok(NotificationId::new(trimmed))
}
