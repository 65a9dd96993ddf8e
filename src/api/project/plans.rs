//! Plan endpoints of the project API

use axum::{
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::middleware::RequireProject;
use crate::api::state::AppState;
use crate::api::types::{
    ApiError, AssignFeatureBody, CreatePlanBody, Json, ListResponse, UpdatePlanBody,
};
use crate::domain::{FeatureId, Plan, PlanFeature, PlanId};

/// GET /api/plans
pub async fn list_plans(
    State(state): State<AppState>,
    RequireProject(project_id): RequireProject,
) -> Result<Json<ListResponse<Plan>>, ApiError> {
    Ok(Json(state.plan_service.list(project_id).await?.into()))
}

/// POST /api/plans
pub async fn create_plan(
    State(state): State<AppState>,
    RequireProject(project_id): RequireProject,
    Json(body): Json<CreatePlanBody>,
) -> Result<(StatusCode, Json<Plan>), ApiError> {
    let plan = state
        .plan_service
        .create(project_id, body.try_into()?)
        .await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

/// GET /api/plans/{plan_id}
pub async fn get_plan(
    State(state): State<AppState>,
    RequireProject(project_id): RequireProject,
    Path(plan_id): Path<String>,
) -> Result<Json<Plan>, ApiError> {
    let plan_id: PlanId = plan_id.parse()?;

    Ok(Json(state.plan_service.get(project_id, plan_id).await?))
}

/// PUT /api/plans/{plan_id}
pub async fn update_plan(
    State(state): State<AppState>,
    RequireProject(project_id): RequireProject,
    Path(plan_id): Path<String>,
    Json(body): Json<UpdatePlanBody>,
) -> Result<Json<Plan>, ApiError> {
    let plan_id: PlanId = plan_id.parse()?;

    let plan = state
        .plan_service
        .update(project_id, plan_id, body.try_into()?)
        .await?;
    Ok(Json(plan))
}

/// GET /api/plans/{plan_id}/features
pub async fn list_plan_features(
    State(state): State<AppState>,
    RequireProject(project_id): RequireProject,
    Path(plan_id): Path<String>,
) -> Result<Json<ListResponse<PlanFeature>>, ApiError> {
    let plan_id: PlanId = plan_id.parse()?;

    let features = state
        .plan_feature_service
        .list_by_plan(project_id, plan_id)
        .await?;
    Ok(Json(features.into()))
}

/// POST /api/plans/{plan_id}/features
pub async fn assign_plan_feature(
    State(state): State<AppState>,
    RequireProject(project_id): RequireProject,
    Path(plan_id): Path<String>,
    Json(body): Json<AssignFeatureBody>,
) -> Result<(StatusCode, Json<PlanFeature>), ApiError> {
    let plan_id: PlanId = plan_id.parse()?;
    let feature_id: FeatureId = body.feature_id.parse()?;

    let assigned = state
        .plan_feature_service
        .assign(project_id, plan_id, feature_id, body.value)
        .await?;
    Ok((StatusCode::CREATED, Json(assigned)))
}
