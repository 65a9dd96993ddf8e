//! PostgreSQL tenant plan repository implementation

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::{
    DomainError, PlanId, ProjectId, TenantId, TenantPlan, TenantPlanId, TenantPlanRepository,
};
use crate::infrastructure::storage::{is_unique_violation, storage_error};

const TENANT_PLAN_COLUMNS: &str = "id, tenant_id, project_id, plan_id, created_at, updated_at";

/// PostgreSQL implementation of TenantPlanRepository
#[derive(Debug, Clone)]
pub struct PostgresTenantPlanRepository {
    pool: PgPool,
}

impl PostgresTenantPlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantPlanRepository for PostgresTenantPlanRepository {
    async fn get(&self, id: TenantPlanId) -> Result<Option<TenantPlan>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM tenant_plans WHERE id = $1",
            TENANT_PLAN_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to get assignment", e))?;

        row.as_ref().map(row_to_tenant_plan).transpose()
    }

    async fn get_by_tenant_and_project(
        &self,
        tenant_id: &TenantId,
        project_id: ProjectId,
    ) -> Result<Option<TenantPlan>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM tenant_plans WHERE tenant_id = $1 AND project_id = $2",
            TENANT_PLAN_COLUMNS
        ))
        .bind(tenant_id.as_str())
        .bind(project_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to get tenant assignment", e))?;

        row.as_ref().map(row_to_tenant_plan).transpose()
    }

    async fn list_by_tenant(&self, tenant_id: &TenantId) -> Result<Vec<TenantPlan>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM tenant_plans WHERE tenant_id = $1 ORDER BY created_at DESC",
            TENANT_PLAN_COLUMNS
        ))
        .bind(tenant_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to list tenant assignments", e))?;

        rows.iter().map(row_to_tenant_plan).collect()
    }

    async fn create(&self, tenant_plan: TenantPlan) -> Result<TenantPlan, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO tenant_plans (id, tenant_id, project_id, plan_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(tenant_plan.id().as_uuid())
        .bind(tenant_plan.tenant_id().as_str())
        .bind(tenant_plan.project_id().as_uuid())
        .bind(tenant_plan.plan_id().as_uuid())
        .bind(tenant_plan.created_at())
        .bind(tenant_plan.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::already_assigned(tenant_plan.tenant_id(), tenant_plan.project_id())
            } else {
                storage_error("Failed to create assignment", e)
            }
        })?;

        Ok(tenant_plan)
    }

    async fn update(&self, tenant_plan: &TenantPlan) -> Result<TenantPlan, DomainError> {
        let result = sqlx::query(
            "UPDATE tenant_plans SET plan_id = $2, updated_at = $3 WHERE id = $1",
        )
        .bind(tenant_plan.id().as_uuid())
        .bind(tenant_plan.plan_id().as_uuid())
        .bind(tenant_plan.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to update assignment", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Assignment '{}' not found",
                tenant_plan.id()
            )));
        }

        Ok(tenant_plan.clone())
    }

    async fn upsert(&self, tenant_plan: TenantPlan) -> Result<TenantPlan, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO tenant_plans (id, tenant_id, project_id, plan_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (tenant_id, project_id)
            DO UPDATE SET plan_id = EXCLUDED.plan_id, updated_at = EXCLUDED.updated_at
            RETURNING {}
            "#,
            TENANT_PLAN_COLUMNS
        ))
        .bind(tenant_plan.id().as_uuid())
        .bind(tenant_plan.tenant_id().as_str())
        .bind(tenant_plan.project_id().as_uuid())
        .bind(tenant_plan.plan_id().as_uuid())
        .bind(tenant_plan.created_at())
        .bind(tenant_plan.updated_at())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to upsert assignment", e))?;

        row_to_tenant_plan(&row)
    }
}

fn row_to_tenant_plan(row: &PgRow) -> Result<TenantPlan, DomainError> {
    let id: Uuid = row.get("id");
    let tenant_id: String = row.get("tenant_id");
    let project_id: Uuid = row.get("project_id");
    let plan_id: Uuid = row.get("plan_id");

    Ok(TenantPlan::new(
        TenantPlanId::from_uuid(id),
        TenantId::new(tenant_id)?,
        ProjectId::from_uuid(project_id),
        PlanId::from_uuid(plan_id),
    )
    .with_timestamps(row.get("created_at"), row.get("updated_at")))
}
