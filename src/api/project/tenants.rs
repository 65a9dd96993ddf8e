//! Tenant resolution endpoints of the project API

use axum::extract::{Path, State};
use tracing::debug;

use crate::api::middleware::RequireProject;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, UpsertTenantPlanBody};
use crate::domain::{EffectivePlan, Entitlements, PlanId, TenantId, TenantPlan};

/// GET /api/tenants/{tenant_id}/plan
///
/// Explicit assignment, or the project's default plan marked `source: default`.
pub async fn get_tenant_plan(
    State(state): State<AppState>,
    RequireProject(project_id): RequireProject,
    Path(tenant_id): Path<String>,
) -> Result<Json<EffectivePlan>, ApiError> {
    let tenant_id = TenantId::new(tenant_id)?;

    Ok(Json(state.tenant_plan_service.resolve(&tenant_id, project_id).await?))
}

/// PUT /api/tenants/{tenant_id}/plan
pub async fn put_tenant_plan(
    State(state): State<AppState>,
    RequireProject(project_id): RequireProject,
    Path(tenant_id): Path<String>,
    Json(body): Json<UpsertTenantPlanBody>,
) -> Result<Json<TenantPlan>, ApiError> {
    let tenant_id = TenantId::new(tenant_id)?;
    let plan_id: PlanId = body.plan_id.parse()?;
    debug!(tenant_id = %tenant_id, plan_id = %plan_id, "Setting tenant plan");

    let assignment = state
        .tenant_plan_service
        .upsert(tenant_id, project_id, plan_id)
        .await?;
    Ok(Json(assignment))
}

/// GET /api/tenants/{tenant_id}/entitlements
pub async fn get_entitlements(
    State(state): State<AppState>,
    RequireProject(project_id): RequireProject,
    Path(tenant_id): Path<String>,
) -> Result<Json<Entitlements>, ApiError> {
    let tenant_id = TenantId::new(tenant_id)?;

    Ok(Json(
        state
            .tenant_plan_service
            .entitlements(&tenant_id, project_id)
            .await?,
    ))
}
