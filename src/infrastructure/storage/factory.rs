//! Storage factory for runtime backend selection

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use crate::domain::{
    ApiKeyRepository, DomainError, FeatureRepository, PlanFeatureRepository, PlanRepository,
    ProjectRepository, TenantPlanRepository,
};
use crate::infrastructure::api_key::{InMemoryApiKeyRepository, PostgresApiKeyRepository};
use crate::infrastructure::feature::{InMemoryFeatureRepository, PostgresFeatureRepository};
use crate::infrastructure::plan::{InMemoryPlanRepository, PostgresPlanRepository};
use crate::infrastructure::plan_feature::{
    InMemoryPlanFeatureRepository, PostgresPlanFeatureRepository,
};
use crate::infrastructure::project::{InMemoryProjectRepository, PostgresProjectRepository};
use crate::infrastructure::tenant_plan::{
    InMemoryTenantPlanRepository, PostgresTenantPlanRepository,
};

use super::migrations::run_migrations;
use super::postgres::{connect_pool, storage_error, PostgresConfig};

/// Supported storage types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl StorageType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// In-memory storage configuration
    InMemory,
    /// PostgreSQL storage configuration
    Postgres(PostgresConfig),
}

impl StorageConfig {
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    pub fn postgres(config: PostgresConfig) -> Self {
        Self::Postgres(config)
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// One repository per aggregate, all on the same backend
#[derive(Debug, Clone)]
pub struct Repositories {
    pub projects: Arc<dyn ProjectRepository>,
    pub plans: Arc<dyn PlanRepository>,
    pub features: Arc<dyn FeatureRepository>,
    pub plan_features: Arc<dyn PlanFeatureRepository>,
    pub tenant_plans: Arc<dyn TenantPlanRepository>,
    pub api_keys: Arc<dyn ApiKeyRepository>,
    pool: Option<PgPool>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            projects: Arc::new(InMemoryProjectRepository::new()),
            plans: Arc::new(InMemoryPlanRepository::new()),
            features: Arc::new(InMemoryFeatureRepository::new()),
            plan_features: Arc::new(InMemoryPlanFeatureRepository::new()),
            tenant_plans: Arc::new(InMemoryTenantPlanRepository::new()),
            api_keys: Arc::new(InMemoryApiKeyRepository::new()),
            pool: None,
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            projects: Arc::new(PostgresProjectRepository::new(pool.clone())),
            plans: Arc::new(PostgresPlanRepository::new(pool.clone())),
            features: Arc::new(PostgresFeatureRepository::new(pool.clone())),
            plan_features: Arc::new(PostgresPlanFeatureRepository::new(pool.clone())),
            tenant_plans: Arc::new(PostgresTenantPlanRepository::new(pool.clone())),
            api_keys: Arc::new(PostgresApiKeyRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    pub fn storage_type(&self) -> StorageType {
        match self.pool {
            Some(_) => StorageType::Postgres,
            None => StorageType::InMemory,
        }
    }

    /// Check the backing store is reachable
    pub async fn ping(&self) -> Result<(), DomainError> {
        if let Some(pool) = &self.pool {
            sqlx::query("SELECT 1")
                .execute(pool)
                .await
                .map_err(|e| storage_error("Storage ping failed", e))?;
        }
        Ok(())
    }
}

/// Factory for creating repository sets
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Build repositories for the configured backend
    ///
    /// PostgreSQL pools are migrated to the latest schema before use.
    pub async fn create(config: &StorageConfig) -> Result<Repositories, DomainError> {
        match config {
            StorageConfig::InMemory => {
                info!("Using in-memory storage");
                Ok(Repositories::in_memory())
            }
            StorageConfig::Postgres(pg_config) => {
                info!(max_connections = pg_config.max_connections, "Connecting to PostgreSQL");
                let pool = connect_pool(pg_config).await?;

                let applied = run_migrations(&pool).await?;
                info!(applied, "PostgreSQL schema up to date");

                Ok(Repositories::postgres(pool))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_type_from_str() {
        assert_eq!(StorageType::from_str("memory"), Some(StorageType::InMemory));
        assert_eq!(StorageType::from_str(" In-Memory "), Some(StorageType::InMemory));
        assert_eq!(StorageType::from_str("postgres"), Some(StorageType::Postgres));
        assert_eq!(StorageType::from_str("postgresql"), Some(StorageType::Postgres));
        assert_eq!(StorageType::from_str("pg"), Some(StorageType::Postgres));
        assert_eq!(StorageType::from_str("unknown"), None);
    }

    #[test]
    fn test_storage_config_types() {
        assert_eq!(StorageConfig::in_memory().storage_type(), StorageType::InMemory);

        let postgres = StorageConfig::postgres(PostgresConfig::new("postgres://localhost/test"));
        assert_eq!(postgres.storage_type(), StorageType::Postgres);
    }

    #[tokio::test]
    async fn test_in_memory_repositories_ping() {
        let repositories = StorageFactory::create(&StorageConfig::in_memory())
            .await
            .unwrap();

        assert_eq!(repositories.storage_type(), StorageType::InMemory);
        assert!(repositories.ping().await.is_ok());
    }
}
