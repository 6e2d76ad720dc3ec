//! Purge-sessions command - deletes expired sessions once and exits

use tracing::info;

pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap();

    let store = crate::create_session_store(&config).await?;
    let purged = store.purge_expired().await?;

    info!(purged, "Purged expired sessions");

    Ok(())
}
