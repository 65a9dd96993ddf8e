//! PostgreSQL plan repository implementation

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool, Row};
use uuid::Uuid;

use crate::domain::{
    DomainError, Plan, PlanId, PlanLimits, PlanRepository, PlanUpdate, ProjectId,
};
use crate::infrastructure::storage::{is_unique_violation, storage_error};

const PLAN_COLUMNS: &str =
    "id, project_id, code, name, description, active, is_default, limits, created_at, updated_at";

/// PostgreSQL implementation of PlanRepository
///
/// Writes run in a transaction that first locks the owning project row, so
/// default-plan changes for one project are serialized. The partial unique
/// index on `plans(project_id) WHERE is_default` backs the invariant.
#[derive(Debug, Clone)]
pub struct PostgresPlanRepository {
    pool: PgPool,
}

impl PostgresPlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn lock_project(conn: &mut PgConnection, project_id: ProjectId) -> Result<(), DomainError> {
    let row = sqlx::query("SELECT id FROM projects WHERE id = $1 FOR UPDATE")
        .bind(project_id.as_uuid())
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| storage_error("Failed to lock project", e))?;

    match row {
        Some(_) => Ok(()),
        None => Err(DomainError::project_not_found(project_id)),
    }
}

async fn demote_defaults(
    conn: &mut PgConnection,
    project_id: ProjectId,
    keep: PlanId,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        UPDATE plans
        SET is_default = FALSE, updated_at = NOW()
        WHERE project_id = $1 AND is_default AND id <> $2
        "#,
    )
    .bind(project_id.as_uuid())
    .bind(keep.as_uuid())
    .execute(&mut *conn)
    .await
    .map_err(|e| storage_error("Failed to demote default plans", e))?;

    Ok(())
}

#[async_trait]
impl PlanRepository for PostgresPlanRepository {
    async fn get(&self, project_id: ProjectId, plan_id: PlanId) -> Result<Option<Plan>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM plans WHERE id = $1 AND project_id = $2",
            PLAN_COLUMNS
        ))
        .bind(plan_id.as_uuid())
        .bind(project_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to get plan", e))?;

        Ok(row.as_ref().map(row_to_plan))
    }

    async fn find(&self, plan_id: PlanId) -> Result<Option<Plan>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM plans WHERE id = $1", PLAN_COLUMNS))
            .bind(plan_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to get plan", e))?;

        Ok(row.as_ref().map(row_to_plan))
    }

    async fn get_by_code(&self, project_id: ProjectId, code: &str) -> Result<Option<Plan>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM plans WHERE project_id = $1 AND code = $2",
            PLAN_COLUMNS
        ))
        .bind(project_id.as_uuid())
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to get plan by code", e))?;

        Ok(row.as_ref().map(row_to_plan))
    }

    async fn find_default(&self, project_id: ProjectId) -> Result<Option<Plan>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM plans WHERE project_id = $1 AND is_default",
            PLAN_COLUMNS
        ))
        .bind(project_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to get default plan", e))?;

        Ok(row.as_ref().map(row_to_plan))
    }

    async fn list(&self, project_id: ProjectId, include_inactive: bool) -> Result<Vec<Plan>, DomainError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM plans
            WHERE project_id = $1 AND (active OR $2)
            ORDER BY is_default DESC, created_at DESC
            "#,
            PLAN_COLUMNS
        ))
        .bind(project_id.as_uuid())
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to list plans", e))?;

        Ok(rows.iter().map(row_to_plan).collect())
    }

    async fn create(&self, mut plan: Plan) -> Result<Plan, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_error("Failed to begin transaction", e))?;

        lock_project(&mut tx, plan.project_id()).await?;

        let has_default: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM plans WHERE project_id = $1 AND is_default)",
        )
        .bind(plan.project_id().as_uuid())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| storage_error("Failed to check default plan", e))?;

        if !has_default && !plan.is_default() {
            plan = plan.with_default(true);
        }
        plan.ensure_default_is_active()?;

        if plan.is_default() {
            demote_defaults(&mut tx, plan.project_id(), plan.id()).await?;
        }

        sqlx::query(
            r#"
            INSERT INTO plans (id, project_id, code, name, description, active, is_default,
                               limits, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(plan.id().as_uuid())
        .bind(plan.project_id().as_uuid())
        .bind(plan.code())
        .bind(plan.name())
        .bind(plan.description())
        .bind(plan.is_active())
        .bind(plan.is_default())
        .bind(Json(plan.limits()))
        .bind(plan.created_at())
        .bind(plan.updated_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::duplicate_code("plan", plan.code())
            } else {
                storage_error("Failed to create plan", e)
            }
        })?;

        tx.commit()
            .await
            .map_err(|e| storage_error("Failed to commit plan", e))?;

        Ok(plan)
    }

    async fn update(
        &self,
        project_id: ProjectId,
        plan_id: PlanId,
        changes: PlanUpdate,
    ) -> Result<Plan, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_error("Failed to begin transaction", e))?;

        lock_project(&mut tx, project_id).await?;

        let mut plan = sqlx::query(&format!(
            "SELECT {} FROM plans WHERE id = $1 AND project_id = $2 FOR UPDATE",
            PLAN_COLUMNS
        ))
        .bind(plan_id.as_uuid())
        .bind(project_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| storage_error("Failed to get plan", e))?
        .as_ref()
        .map(row_to_plan)
        .ok_or_else(|| DomainError::plan_not_found(plan_id))?;

        plan.apply(&changes)?;

        if changes.promotes() {
            demote_defaults(&mut tx, project_id, plan_id).await?;
        }

        sqlx::query(
            r#"
            UPDATE plans
            SET name = $2, description = $3, active = $4, is_default = $5, limits = $6,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(plan.id().as_uuid())
        .bind(plan.name())
        .bind(plan.description())
        .bind(plan.is_active())
        .bind(plan.is_default())
        .bind(Json(plan.limits()))
        .bind(plan.updated_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| storage_error("Failed to update plan", e))?;

        tx.commit()
            .await
            .map_err(|e| storage_error("Failed to commit plan", e))?;

        Ok(plan)
    }
}

fn row_to_plan(row: &PgRow) -> Plan {
    let id: Uuid = row.get("id");
    let project_id: Uuid = row.get("project_id");
    let code: String = row.get("code");
    let name: String = row.get("name");
    let limits: Json<PlanLimits> = row.get("limits");

    Plan::new(
        PlanId::from_uuid(id),
        ProjectId::from_uuid(project_id),
        code,
        name,
    )
    .with_description(row.get("description"))
    .with_active(row.get("active"))
    .with_default(row.get("is_default"))
    .with_limits(limits.0)
    .with_timestamps(row.get("created_at"), row.get("updated_at"))
}
