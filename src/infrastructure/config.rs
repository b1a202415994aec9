use super::env::{get_env_opt, get_env_or, get_env_parsed};
use crate::domain::services::ReconnectPolicy;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_WS_URL: &str = "ws://localhost:8080/ws";
pub const DEFAULT_TOPIC_PREFIX: &str = "/topic/notifications";

#[derive(Debug, Clone, PartialEq)]
pub struct SyncConfig {
    pub api_base_url: String,
    pub ws_url: String,
    pub auth_token: Option<String>,
    pub request_timeout: Duration,
    pub reconnect_delay: Duration,
    pub max_reconnect_attempts: u32,
    pub push_buffer: usize,
    pub event_buffer: usize,
    pub dispatch_dedupe_capacity: u64,
    pub dispatch_dedupe_ttl: Duration,
    pub topic_prefix: String,
    pub desktop_notifications: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            ws_url: DEFAULT_WS_URL.to_string(),
            auth_token: None,
            request_timeout: Duration::from_secs(30),
            reconnect_delay: Duration::from_secs(3),
            max_reconnect_attempts: 5,
            push_buffer: 64,
            event_buffer: 128,
            dispatch_dedupe_capacity: 1000,
            dispatch_dedupe_ttl: Duration::from_secs(3600), // 1 hour
            topic_prefix: DEFAULT_TOPIC_PREFIX.to_string(),
            desktop_notifications: true,
        }
    }
}

impl SyncConfig {
    pub fn new(api_base_url: impl Into<String>, ws_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            ws_url: ws_url.into(),
            ..Self::default()
        }
    }

    /// Reads `NOTIFICATION_SYNC_*` variables; anything unset or malformed
    /// keeps its default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: get_env_or("NOTIFICATION_SYNC_API_URL", &defaults.api_base_url),
            ws_url: get_env_or("NOTIFICATION_SYNC_WS_URL", &defaults.ws_url),
            auth_token: get_env_opt("NOTIFICATION_SYNC_AUTH_TOKEN"),
            request_timeout: Duration::from_secs(get_env_parsed(
                "NOTIFICATION_SYNC_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )),
            reconnect_delay: Duration::from_millis(get_env_parsed(
                "NOTIFICATION_SYNC_RECONNECT_DELAY_MS",
                defaults.reconnect_delay.as_millis() as u64,
            )),
            max_reconnect_attempts: get_env_parsed(
                "NOTIFICATION_SYNC_MAX_RECONNECT_ATTEMPTS",
                defaults.max_reconnect_attempts,
            ),
            push_buffer: get_env_parsed("NOTIFICATION_SYNC_PUSH_BUFFER", defaults.push_buffer),
            event_buffer: get_env_parsed("NOTIFICATION_SYNC_EVENT_BUFFER", defaults.event_buffer),
            dispatch_dedupe_capacity: get_env_parsed(
                "NOTIFICATION_SYNC_DEDUPE_CAPACITY",
                defaults.dispatch_dedupe_capacity,
            ),
            dispatch_dedupe_ttl: Duration::from_secs(get_env_parsed(
                "NOTIFICATION_SYNC_DEDUPE_TTL_SECS",
                defaults.dispatch_dedupe_ttl.as_secs(),
            )),
            topic_prefix: get_env_or("NOTIFICATION_SYNC_TOPIC_PREFIX", &defaults.topic_prefix),
            desktop_notifications: get_env_parsed(
                "NOTIFICATION_SYNC_DESKTOP_NOTIFICATIONS",
                defaults.desktop_notifications,
            ),
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_reconnect(mut self, max_attempts: u32, delay: Duration) -> Self {
        self.max_reconnect_attempts = max_attempts;
        self.reconnect_delay = delay;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_topic_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.topic_prefix = prefix.into();
        self
    }

    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy {
            max_attempts: self.max_reconnect_attempts.max(1),
            delay: self.reconnect_delay,
        }
    }

    /// Destination the push connector subscribes to for a tenant.
    pub fn topic_for(&self, tenant_id: &str) -> String {
        format!("{}/{}", self.topic_prefix.trim_end_matches('/'), tenant_id)
    }
}
