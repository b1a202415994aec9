use std::sync::Once;
use tracing_subscriber::{self, fmt::format::FmtSpan};

// Mock implementations
pub mod mock;
pub use mock::*;

// Test utilities
pub mod test_utils;
pub use test_utils::*;

static INIT: Once = Once::new();

pub fn init() {
    INIT.call_once(|| {
        // Try to initialize tracing, ignore if it's already initialized
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_span_events(FmtSpan::CLOSE)
            .with_test_writer()
            .compact()
            .try_init();

        dotenv::dotenv().ok();
    });
}
