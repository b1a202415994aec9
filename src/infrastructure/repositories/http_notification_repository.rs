use crate::domain::{
    entities::{Notification, NotificationId, TenantId},
    error::{DomainError, DomainResult},
    repositories::NotificationRepository,
};
use crate::infrastructure::config::SyncConfig;
use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use tracing::debug;

/// REST side of the notification backend.
#[derive(Debug, Clone)]
pub struct HttpNotificationRepository {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpNotificationRepository {
    pub fn new(config: &SyncConfig) -> DomainResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(header::ACCEPT, "application/json");
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn check(response: Response, action: &str) -> DomainResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = format!("Failed to {}: {} {}", action, status, body.trim());
        if status == StatusCode::NOT_FOUND {
            return Err(DomainError::NotFoundError(message));
        }
        Err(DomainError::ExternalServiceError(message))
    }
}

#[async_trait]
impl NotificationRepository for HttpNotificationRepository {
    async fn fetch_snapshot(&self, tenant_id: &TenantId) -> DomainResult<Vec<Notification>> {
        let url = format!("{}/notifications/tenant/{}", self.base_url, tenant_id);
        debug!("Fetching notification snapshot from {}", url);

        let response = self.authorize(self.client.get(&url)).send().await?;
        let response = Self::check(response, "fetch notifications").await?;

        response.json::<Vec<Notification>>().await.map_err(|e| {
            DomainError::ExternalServiceError(format!("Failed to parse notifications: {}", e))
        })
    }

    async fn mark_as_read(&self, id: &NotificationId) -> DomainResult<()> {
        let url = format!("{}/notifications/{}/read", self.base_url, id);
        let response = self.authorize(self.client.put(&url)).send().await?;
        Self::check(response, "mark notification as read").await?;
        Ok(())
    }

    async fn delete(&self, id: &NotificationId) -> DomainResult<()> {
        let url = format!("{}/notifications/{}", self.base_url, id);
        let response = self.authorize(self.client.delete(&url)).send().await?;
        Self::check(response, "delete notification").await?;
        Ok(())
    }
}
