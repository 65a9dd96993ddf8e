//! PostgreSQL feature repository implementation

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::{
    DomainError, Feature, FeatureId, FeatureKind, FeatureRepository, FeatureUpdate, ProjectId,
};
use crate::infrastructure::storage::{is_unique_violation, storage_error};

const FEATURE_COLUMNS: &str =
    "id, project_id, code, kind, name, description, active, created_at, updated_at";

/// PostgreSQL implementation of FeatureRepository
#[derive(Debug, Clone)]
pub struct PostgresFeatureRepository {
    pool: PgPool,
}

impl PostgresFeatureRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeatureRepository for PostgresFeatureRepository {
    async fn get(&self, project_id: ProjectId, feature_id: FeatureId) -> Result<Option<Feature>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM features WHERE id = $1 AND project_id = $2",
            FEATURE_COLUMNS
        ))
        .bind(feature_id.as_uuid())
        .bind(project_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to get feature", e))?;

        row.as_ref().map(row_to_feature).transpose()
    }

    async fn find(&self, feature_id: FeatureId) -> Result<Option<Feature>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM features WHERE id = $1",
            FEATURE_COLUMNS
        ))
        .bind(feature_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to get feature", e))?;

        row.as_ref().map(row_to_feature).transpose()
    }

    async fn get_by_code(&self, project_id: ProjectId, code: &str) -> Result<Option<Feature>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM features WHERE project_id = $1 AND code = $2",
            FEATURE_COLUMNS
        ))
        .bind(project_id.as_uuid())
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to get feature by code", e))?;

        row.as_ref().map(row_to_feature).transpose()
    }

    async fn list(&self, project_id: ProjectId, include_inactive: bool) -> Result<Vec<Feature>, DomainError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM features
            WHERE project_id = $1 AND (active OR $2)
            ORDER BY created_at DESC
            "#,
            FEATURE_COLUMNS
        ))
        .bind(project_id.as_uuid())
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to list features", e))?;

        rows.iter().map(row_to_feature).collect()
    }

    async fn create(&self, feature: Feature) -> Result<Feature, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO features (id, project_id, code, kind, name, description, active,
                                  created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(feature.id().as_uuid())
        .bind(feature.project_id().as_uuid())
        .bind(feature.code())
        .bind(feature.kind().as_str())
        .bind(feature.name())
        .bind(feature.description())
        .bind(feature.is_active())
        .bind(feature.created_at())
        .bind(feature.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::duplicate_code("feature", feature.code())
            } else {
                storage_error("Failed to create feature", e)
            }
        })?;

        Ok(feature)
    }

    async fn update(
        &self,
        project_id: ProjectId,
        feature_id: FeatureId,
        changes: FeatureUpdate,
    ) -> Result<Feature, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_error("Failed to begin transaction", e))?;

        let row = sqlx::query(&format!(
            "SELECT {} FROM features WHERE id = $1 AND project_id = $2 FOR UPDATE",
            FEATURE_COLUMNS
        ))
        .bind(feature_id.as_uuid())
        .bind(project_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| storage_error("Failed to get feature", e))?
        .ok_or_else(|| DomainError::feature_not_found(feature_id))?;

        let mut feature = row_to_feature(&row)?;
        feature.apply(&changes);

        sqlx::query(
            r#"
            UPDATE features
            SET name = $2, description = $3, active = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(feature.id().as_uuid())
        .bind(feature.name())
        .bind(feature.description())
        .bind(feature.is_active())
        .bind(feature.updated_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| storage_error("Failed to update feature", e))?;

        tx.commit()
            .await
            .map_err(|e| storage_error("Failed to commit feature", e))?;

        Ok(feature)
    }
}

fn row_to_feature(row: &PgRow) -> Result<Feature, DomainError> {
    let id: Uuid = row.get("id");
    let project_id: Uuid = row.get("project_id");
    let code: String = row.get("code");
    let kind: String = row.get("kind");
    let name: String = row.get("name");

    let kind: FeatureKind = kind
        .parse()
        .map_err(|_| DomainError::internal(format!("Unknown feature kind '{}' in storage", kind)))?;

    Ok(Feature::new(
        FeatureId::from_uuid(id),
        ProjectId::from_uuid(project_id),
        code,
        kind,
        name,
    )
    .with_description(row.get("description"))
    .with_active(row.get("active"))
    .with_timestamps(row.get("created_at"), row.get("updated_at")))
}
