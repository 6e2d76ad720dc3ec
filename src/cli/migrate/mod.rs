//! Migrate command - applies or reverts schema migrations

use clap::Args;
use tracing::info;

use crate::config::StorageBackend;
use crate::infrastructure::storage::{connect_pool, Migrator, PostgresMigrator};

#[derive(Args, Clone, Debug)]
pub struct MigrateArgs {
    /// Revert the most recent migration instead of applying pending ones
    #[arg(long)]
    pub revert: bool,
}

pub async fn run(args: MigrateArgs) -> anyhow::Result<()> {
    let config = super::bootstrap();

    if config.storage.backend != StorageBackend::Postgres {
        info!("Storage backend is in-memory; nothing to migrate");
        return Ok(());
    }

    let pool = connect_pool(&config.database).await?;
    let migrator = PostgresMigrator::new(pool);

    if args.revert {
        match migrator.revert().await? {
            Some(version) => info!(version, "Reverted migration"),
            None => info!("No migrations to revert"),
        }
    } else {
        let applied = migrator.run().await?;
        info!(applied, version = ?migrator.version().await?, "Migrations complete");
    }

    Ok(())
}
