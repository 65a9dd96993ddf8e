//! Migrate command - applies the PostgreSQL schema and exits

use anyhow::{bail, Context};
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::storage::{
    connect_pool, run_migrations, PostgresMigrator, StorageConfig,
};

/// Apply pending migrations against the configured database
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let storage = config
        .storage
        .to_storage_config()
        .map_err(anyhow::Error::msg)?;

    let StorageConfig::Postgres(postgres) = storage else {
        bail!("migrate requires storage.backend = postgres");
    };

    let pool = connect_pool(&postgres)
        .await
        .context("Failed to connect to PostgreSQL")?;

    let applied = run_migrations(&pool).await?;
    let version = PostgresMigrator::new(pool.clone()).current_version().await?;

    info!(applied = applied, version = ?version, "Migrations complete");
    pool.close().await;

    Ok(())
}
