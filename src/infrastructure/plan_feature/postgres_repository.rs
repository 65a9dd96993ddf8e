//! PostgreSQL plan-feature repository implementation

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::{
    DomainError, FeatureId, PlanFeature, PlanFeatureId, PlanFeatureRepository, PlanId, ProjectId,
};
use crate::infrastructure::storage::{is_unique_violation, storage_error};

/// PostgreSQL implementation of PlanFeatureRepository
///
/// Values are stored in a JSONB column and come back in their original shape.
#[derive(Debug, Clone)]
pub struct PostgresPlanFeatureRepository {
    pool: PgPool,
}

impl PostgresPlanFeatureRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlanFeatureRepository for PostgresPlanFeatureRepository {
    async fn create(&self, plan_feature: PlanFeature) -> Result<PlanFeature, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO plan_features (id, project_id, plan_id, feature_id, value,
                                       created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(plan_feature.id().as_uuid())
        .bind(plan_feature.project_id().as_uuid())
        .bind(plan_feature.plan_id().as_uuid())
        .bind(plan_feature.feature_id().as_uuid())
        .bind(Json(plan_feature.value()))
        .bind(plan_feature.created_at())
        .bind(plan_feature.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::duplicate_assignment(plan_feature.plan_id(), plan_feature.feature_id())
            } else {
                storage_error("Failed to create plan feature", e)
            }
        })?;

        Ok(plan_feature)
    }

    async fn list_by_plan(&self, project_id: ProjectId, plan_id: PlanId) -> Result<Vec<PlanFeature>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, project_id, plan_id, feature_id, value, created_at, updated_at
            FROM plan_features
            WHERE project_id = $1 AND plan_id = $2
            ORDER BY created_at
            "#,
        )
        .bind(project_id.as_uuid())
        .bind(plan_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to list plan features", e))?;

        Ok(rows.iter().map(row_to_plan_feature).collect())
    }
}

fn row_to_plan_feature(row: &PgRow) -> PlanFeature {
    let id: Uuid = row.get("id");
    let project_id: Uuid = row.get("project_id");
    let plan_id: Uuid = row.get("plan_id");
    let feature_id: Uuid = row.get("feature_id");
    let value: Json<Value> = row.get("value");

    PlanFeature::new(
        PlanFeatureId::from_uuid(id),
        ProjectId::from_uuid(project_id),
        PlanId::from_uuid(plan_id),
        FeatureId::from_uuid(feature_id),
        value.0,
    )
    .with_timestamps(row.get("created_at"), row.get("updated_at"))
}
