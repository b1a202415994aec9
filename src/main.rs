use anyhow::Context;
use notification_sync::{domain::entities::TenantId, infrastructure::SyncConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before the filter reads RUST_LOG
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(false)
        .init();

    let tenant_id = std::env::var("NOTIFICATION_SYNC_TENANT_ID")
        .context("NOTIFICATION_SYNC_TENANT_ID must be set")?;

    // Run the sync session
    notification_sync::run(SyncConfig::from_env(), TenantId::new(tenant_id)).await
}
