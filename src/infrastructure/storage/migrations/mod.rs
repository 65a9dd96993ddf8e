//! Database migrations infrastructure

use sqlx::postgres::PgPool;
use tracing::info;

use super::postgres::storage_error;
use crate::domain::DomainError;

/// Versioned migrator for PostgreSQL
///
/// Each migration is applied together with its bookkeeping row in one
/// transaction, so a failed migration leaves nothing behind.
#[derive(Debug)]
pub struct PostgresMigrator {
    pool: PgPool,
}

impl PostgresMigrator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the migrations table if it doesn't exist
    async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version BIGINT PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to create migrations table", e))?;

        Ok(())
    }

    /// Runs a single migration, returning whether it was applied
    pub async fn run_migration(&self, migration: &Migration) -> Result<bool, DomainError> {
        self.ensure_migrations_table().await?;

        let applied: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _migrations WHERE version = $1)")
                .bind(migration.version)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| storage_error("Failed to check migration status", e))?;

        if applied {
            return Ok(false);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_error("Failed to begin migration", e))?;

        // Multi-statement scripts need the simple query protocol
        sqlx::raw_sql(&migration.up)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                storage_error(&format!("Failed to run migration {}", migration.version), e)
            })?;

        sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(&migration.description)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                storage_error(&format!("Failed to record migration {}", migration.version), e)
            })?;

        tx.commit()
            .await
            .map_err(|e| storage_error("Failed to commit migration", e))?;

        info!(
            version = migration.version,
            description = %migration.description,
            "Applied migration"
        );

        Ok(true)
    }

    /// Reverts a single migration
    pub async fn revert_migration(&self, migration: &Migration) -> Result<(), DomainError> {
        self.ensure_migrations_table().await?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_error("Failed to begin revert", e))?;

        let removed = sqlx::query("DELETE FROM _migrations WHERE version = $1")
            .bind(migration.version)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage_error("Failed to remove migration record", e))?;

        if removed.rows_affected() == 0 {
            return Ok(());
        }

        sqlx::raw_sql(&migration.down)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                storage_error(&format!("Failed to revert migration {}", migration.version), e)
            })?;

        tx.commit()
            .await
            .map_err(|e| storage_error("Failed to commit revert", e))?;

        info!(version = migration.version, "Reverted migration");

        Ok(())
    }

    /// Returns the latest applied migration version
    pub async fn current_version(&self) -> Result<Option<i64>, DomainError> {
        self.ensure_migrations_table().await?;

        let version: Option<i64> = sqlx::query_scalar("SELECT MAX(version) FROM _migrations")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to get migration version", e))?;

        Ok(version)
    }
}

/// Represents a database migration
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub description: String,
    /// SQL to run when applying the migration
    pub up: String,
    /// SQL to run when reverting the migration
    pub down: String,
}

impl Migration {
    pub fn new(
        version: i64,
        description: impl Into<String>,
        up: impl Into<String>,
        down: impl Into<String>,
    ) -> Self {
        Self {
            version,
            description: description.into(),
            up: up.into(),
            down: down.into(),
        }
    }
}

/// Schema migrations, in application order
pub fn schema_migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "Create projects table",
            r#"
            CREATE TABLE IF NOT EXISTS projects (
                id UUID PRIMARY KEY,
                code VARCHAR(64) NOT NULL,
                name VARCHAR(255) NOT NULL,
                description TEXT,
                active BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CONSTRAINT projects_code_key UNIQUE (code)
            );
            CREATE INDEX IF NOT EXISTS idx_projects_created_at ON projects(created_at);
            "#,
            r#"
            DROP TABLE IF EXISTS projects;
            "#,
        ),
        Migration::new(
            2,
            "Create plans table",
            r#"
            CREATE TABLE IF NOT EXISTS plans (
                id UUID PRIMARY KEY,
                project_id UUID NOT NULL REFERENCES projects(id),
                code VARCHAR(64) NOT NULL,
                name VARCHAR(255) NOT NULL,
                description TEXT,
                active BOOLEAN NOT NULL DEFAULT TRUE,
                is_default BOOLEAN NOT NULL DEFAULT FALSE,
                limits JSONB NOT NULL DEFAULT '{}'::jsonb,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CONSTRAINT plans_project_code_key UNIQUE (project_id, code)
            );
            CREATE UNIQUE INDEX IF NOT EXISTS plans_one_default_per_project
                ON plans(project_id) WHERE is_default;
            "#,
            r#"
            DROP TABLE IF EXISTS plans;
            "#,
        ),
        Migration::new(
            3,
            "Create features table",
            r#"
            CREATE TABLE IF NOT EXISTS features (
                id UUID PRIMARY KEY,
                project_id UUID NOT NULL REFERENCES projects(id),
                code VARCHAR(64) NOT NULL,
                kind VARCHAR(16) NOT NULL CHECK (kind IN ('flag', 'numeric', 'value')),
                name VARCHAR(255) NOT NULL,
                description TEXT,
                active BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CONSTRAINT features_project_code_key UNIQUE (project_id, code)
            );
            "#,
            r#"
            DROP TABLE IF EXISTS features;
            "#,
        ),
        Migration::new(
            4,
            "Create plan_features table",
            r#"
            CREATE TABLE IF NOT EXISTS plan_features (
                id UUID PRIMARY KEY,
                project_id UUID NOT NULL REFERENCES projects(id),
                plan_id UUID NOT NULL REFERENCES plans(id),
                feature_id UUID NOT NULL REFERENCES features(id),
                value JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CONSTRAINT plan_features_plan_feature_key UNIQUE (plan_id, feature_id)
            );
            "#,
            r#"
            DROP TABLE IF EXISTS plan_features;
            "#,
        ),
        Migration::new(
            5,
            "Create tenant_plans table",
            r#"
            CREATE TABLE IF NOT EXISTS tenant_plans (
                id UUID PRIMARY KEY,
                tenant_id VARCHAR(255) NOT NULL,
                project_id UUID NOT NULL REFERENCES projects(id),
                plan_id UUID NOT NULL REFERENCES plans(id),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CONSTRAINT tenant_plans_tenant_project_key UNIQUE (tenant_id, project_id)
            );
            "#,
            r#"
            DROP TABLE IF EXISTS tenant_plans;
            "#,
        ),
        Migration::new(
            6,
            "Create api_keys table",
            r#"
            CREATE TABLE IF NOT EXISTS api_keys (
                id UUID PRIMARY KEY,
                project_id UUID NOT NULL REFERENCES projects(id),
                key_hash VARCHAR(128) NOT NULL,
                key_prefix VARCHAR(16) NOT NULL,
                revoked BOOLEAN NOT NULL DEFAULT FALSE,
                revoked_at TIMESTAMPTZ,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CONSTRAINT api_keys_key_hash_key UNIQUE (key_hash)
            );
            CREATE UNIQUE INDEX IF NOT EXISTS api_keys_one_active_per_project
                ON api_keys(project_id) WHERE NOT revoked;
            CREATE INDEX IF NOT EXISTS idx_api_keys_project_prefix
                ON api_keys(project_id, key_prefix);
            "#,
            r#"
            DROP TABLE IF EXISTS api_keys;
            "#,
        ),
    ]
}

/// Runs all pending schema migrations, returning how many were applied
pub async fn run_migrations(pool: &PgPool) -> Result<usize, DomainError> {
    let migrator = PostgresMigrator::new(pool.clone());
    let mut applied = 0;

    for migration in schema_migrations() {
        if migrator.run_migration(&migration).await? {
            applied += 1;
        }
    }

    Ok(applied)
}
