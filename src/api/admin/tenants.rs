//! Tenant assignment admin endpoints
//!
//! Assignments here are made by project and plan code. A tenant holds one
//! assignment per project; changing it goes through PATCH.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use tracing::debug;

use crate::api::middleware::RequireAdmin;
use crate::api::state::AppState;
use crate::api::types::{
    ApiError, AssignTenantPlanBody, Json, ListResponse, ReassignTenantPlanBody,
};
use crate::domain::{TenantId, TenantPlan, TenantPlanId};

/// GET /admin/tenants/{tenant_id}/assignments
pub async fn list_assignments(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(tenant_id): Path<String>,
) -> Result<Json<ListResponse<TenantPlan>>, ApiError> {
    let tenant_id = TenantId::new(tenant_id)?;

    let assignments = state.tenant_plan_service.list_assignments(&tenant_id).await?;
    Ok(Json(assignments.into()))
}

/// POST /admin/tenants/{tenant_id}/assignments
pub async fn create_assignment(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(tenant_id): Path<String>,
    Json(body): Json<AssignTenantPlanBody>,
) -> Result<(StatusCode, Json<TenantPlan>), ApiError> {
    let tenant_id = TenantId::new(tenant_id)?;
    debug!(tenant_id = %tenant_id, project = %body.project_code, "Admin assigning plan");

    let assignment = state
        .tenant_plan_service
        .assign(tenant_id, &body.project_code, &body.plan_code)
        .await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

/// PATCH /admin/tenants/{tenant_id}/assignments/{assignment_id}
pub async fn update_assignment(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path((tenant_id, assignment_id)): Path<(String, String)>,
    Json(body): Json<ReassignTenantPlanBody>,
) -> Result<Json<TenantPlan>, ApiError> {
    let tenant_id = TenantId::new(tenant_id)?;
    let assignment_id: TenantPlanId = assignment_id.parse()?;

    let assignment = state
        .tenant_plan_service
        .reassign(&tenant_id, assignment_id, &body.plan_code)
        .await?;
    Ok(Json(assignment))
}
