pub mod notification;
pub mod sync_state;

pub use notification::{Notification, NotificationId, TenantId};

pub use sync_state::{ConnectionState, NotificationPermission, SyncPhase};
