pub mod common;
pub mod integration;

pub use common::{init, mock::*, test_utils::*};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
        let config = test_config("http://localhost:1", "ws://localhost:1/ws");
        assert!(!config.desktop_notifications);
        assert_eq!(config.reconnect_policy().max_attempts, 3);
    }
}
