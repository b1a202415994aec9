use crate::application::FeedPage;
use crate::domain::{
    entities::{ConnectionState, Notification, SyncPhase},
    error::DomainError,
    services::NotificationView,
};
use crate::presentation::middleware::ValidatedCommand;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_PER_PAGE: u32 = 20;

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    #[validate(range(min = 1, message = "Page must be greater than 0"))]
    pub page: Option<u32>,
    #[validate(range(
        min = 1,
        max = 100,
        message = "Items per page must be between 1 and 100"
    ))]
    pub per_page: Option<u32>,
}

impl ValidatedCommand for PageRequest {}

impl PageRequest {
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1) as usize
    }

    pub fn per_page(&self) -> usize {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE) as usize
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: String,
    pub tenant_id: String,
    pub subject: String,
    pub message: String,
    pub sender_name: Option<String>,
    pub read: bool,
    pub created_at: String,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id.to_string(),
            tenant_id: notification.tenant_id.to_string(),
            subject: notification.subject,
            message: notification.message,
            sender_name: notification.sender_name,
            read: notification.read,
            created_at: notification.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationListResponse {
    pub notifications: Vec<NotificationResponse>,
    pub total: usize,
    pub unread_count: usize,
    pub page: usize,
    pub per_page: usize,
    pub has_more: bool,
}

impl From<FeedPage> for NotificationListResponse {
    fn from(page: FeedPage) -> Self {
        Self {
            notifications: page.items.into_iter().map(Into::into).collect(),
            total: page.total,
            unread_count: page.unread_count,
            page: page.page,
            per_page: page.per_page,
            has_more: page.has_more,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatusResponse {
    pub tenant_id: Option<String>,
    pub phase: SyncPhase,
    pub connection: ConnectionState,
    pub total: usize,
    pub unread_count: usize,
    pub last_error: Option<String>,
}

impl From<NotificationView> for SyncStatusResponse {
    fn from(view: NotificationView) -> Self {
        Self {
            tenant_id: view.tenant_id.map(|t| t.to_string()),
            phase: view.phase,
            connection: view.connection,
            total: view.notifications.len(),
            unread_count: view.unread_count,
            last_error: view.last_error,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NotificationError {
    pub code: String,
    pub message: String,
    pub details: Vec<String>,
}

impl NotificationError {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: vec![],
        }
    }

    pub fn invalid_id(raw: &str) -> Self {
        Self::new("INVALID_ID", format!("Invalid notification id: {:?}", raw))
    }
}

impl From<DomainError> for NotificationError {
    fn from(error: DomainError) -> Self {
        let code = match &error {
            DomainError::ValidationError(_) => "VALIDATION_ERROR",
            DomainError::NotFoundError(_) => "NOT_FOUND",
            DomainError::ConflictError(_) => "CONFLICT",
            DomainError::InternalError(_) => "INTERNAL_ERROR",
            DomainError::ExternalServiceError(_) => "EXTERNAL_SERVICE_ERROR",
            DomainError::TransportError(_) => "TRANSPORT_ERROR",
            DomainError::NotActive => "NOT_ACTIVE",
        };
        let message = match error {
            DomainError::ValidationError(msg)
            | DomainError::NotFoundError(msg)
            | DomainError::ConflictError(msg)
            | DomainError::InternalError(msg)
            | DomainError::ExternalServiceError(msg)
            | DomainError::TransportError(msg) => msg,
            DomainError::NotActive => DomainError::NotActive.to_string(),
        };
        Self::new(code, message)
    }
}

impl std::fmt::Display for NotificationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for NotificationError {}
