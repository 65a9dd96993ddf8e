//! PostgreSQL API key repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};
use uuid::Uuid;

use crate::domain::{ApiKey, ApiKeyId, ApiKeyRepository, DomainError, ProjectId};
use crate::infrastructure::storage::{is_unique_violation, storage_error};

const API_KEY_COLUMNS: &str = "id, project_id, key_hash, key_prefix, revoked, revoked_at, created_at";

/// PostgreSQL implementation of ApiKeyRepository
///
/// The partial unique index on `api_keys(project_id) WHERE NOT revoked`
/// guarantees a single active key per project.
#[derive(Debug, Clone)]
pub struct PostgresApiKeyRepository {
    pool: PgPool,
}

impl PostgresApiKeyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn revoke_active(
    conn: &mut PgConnection,
    project_id: ProjectId,
    key_prefix: Option<&str>,
) -> Result<u64, DomainError> {
    let result = sqlx::query(
        r#"
        UPDATE api_keys
        SET revoked = TRUE, revoked_at = NOW()
        WHERE project_id = $1 AND NOT revoked AND ($2::TEXT IS NULL OR key_prefix = $2)
        "#,
    )
    .bind(project_id.as_uuid())
    .bind(key_prefix)
    .execute(&mut *conn)
    .await
    .map_err(|e| storage_error("Failed to revoke API keys", e))?;

    Ok(result.rows_affected())
}

#[async_trait]
impl ApiKeyRepository for PostgresApiKeyRepository {
    async fn replace_active(&self, api_key: ApiKey) -> Result<ApiKey, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_error("Failed to begin transaction", e))?;

        let project = sqlx::query("SELECT id FROM projects WHERE id = $1 FOR UPDATE")
            .bind(api_key.project_id().as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| storage_error("Failed to lock project", e))?;

        if project.is_none() {
            return Err(DomainError::project_not_found(api_key.project_id()));
        }

        revoke_active(&mut tx, api_key.project_id(), None).await?;

        sqlx::query(
            r#"
            INSERT INTO api_keys (id, project_id, key_hash, key_prefix, revoked, revoked_at, created_at)
            VALUES ($1, $2, $3, $4, FALSE, NULL, $5)
            "#,
        )
        .bind(api_key.id().as_uuid())
        .bind(api_key.project_id().as_uuid())
        .bind(api_key.key_hash())
        .bind(api_key.key_prefix())
        .bind(api_key.created_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::internal(format!("API key '{}' collides with a stored key", api_key.id()))
            } else {
                storage_error("Failed to create API key", e)
            }
        })?;

        tx.commit()
            .await
            .map_err(|e| storage_error("Failed to commit API key", e))?;

        Ok(api_key)
    }

    async fn revoke_all(&self, project_id: ProjectId) -> Result<u64, DomainError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| storage_error("Failed to acquire connection", e))?;

        revoke_active(&mut conn, project_id, None).await
    }

    async fn revoke_by_prefix(
        &self,
        project_id: ProjectId,
        key_prefix: &str,
    ) -> Result<u64, DomainError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| storage_error("Failed to acquire connection", e))?;

        revoke_active(&mut conn, project_id, Some(key_prefix)).await
    }

    async fn get_active_by_hash(&self, key_hash: &str) -> Result<Option<ApiKey>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM api_keys WHERE key_hash = $1 AND NOT revoked",
            API_KEY_COLUMNS
        ))
        .bind(key_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to look up API key", e))?;

        Ok(row.as_ref().map(row_to_api_key))
    }

    async fn list_by_project(&self, project_id: ProjectId) -> Result<Vec<ApiKey>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM api_keys WHERE project_id = $1 ORDER BY created_at DESC",
            API_KEY_COLUMNS
        ))
        .bind(project_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to list API keys", e))?;

        Ok(rows.iter().map(row_to_api_key).collect())
    }
}

fn row_to_api_key(row: &PgRow) -> ApiKey {
    let id: Uuid = row.get("id");
    let project_id: Uuid = row.get("project_id");
    let key_hash: String = row.get("key_hash");
    let key_prefix: String = row.get("key_prefix");
    let revoked: bool = row.get("revoked");
    let revoked_at: Option<DateTime<Utc>> = row.get("revoked_at");

    ApiKey::new(
        ApiKeyId::from_uuid(id),
        ProjectId::from_uuid(project_id),
        key_hash,
        key_prefix,
    )
    .with_revocation(revoked, revoked_at)
    .with_created_at(row.get("created_at"))
}
