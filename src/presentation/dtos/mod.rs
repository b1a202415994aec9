pub mod notification;
pub mod validation;

pub use notification::{
    NotificationError, NotificationListResponse, NotificationResponse, PageRequest,
    SyncStatusResponse,
};

pub use validation::ValidationError;
