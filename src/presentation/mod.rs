pub mod controllers;
pub mod dtos;
pub mod middleware;

pub use controllers::NotificationController;
pub use dtos::{
    NotificationError, NotificationListResponse, NotificationResponse, PageRequest,
    SyncStatusResponse, ValidationError,
};
pub use middleware::{
    validate_command, validate_request, ValidatedCommand, ValidationMiddlewareError,
};
