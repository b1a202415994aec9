pub mod use_cases;

pub use use_cases::{FeedPage, NotificationFeed};
