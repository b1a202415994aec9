use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of the push connection for one tenant subscription.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    ReconnectScheduled,
    Failed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "DISCONNECTED"),
            ConnectionState::Connecting => write!(f, "CONNECTING"),
            ConnectionState::Connected => write!(f, "CONNECTED"),
            ConnectionState::ReconnectScheduled => write!(f, "RECONNECT_SCHEDULED"),
            ConnectionState::Failed => write!(f, "FAILED"),
        }
    }
}

/// Lifecycle of the coordinator's tenant session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncPhase {
    Inactive,
    Syncing,
    Live,
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SyncPhase::Inactive => write!(f, "INACTIVE"),
            SyncPhase::Syncing => write!(f, "SYNCING"),
            SyncPhase::Live => write!(f, "LIVE"),
        }
    }
}

/// Host capability to show OS-level notifications.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPermission {
    #[default]
    Default,
    Granted,
    Denied,
}
