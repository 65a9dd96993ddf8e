//! Feature catalog admin endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use tracing::debug;

use crate::api::middleware::RequireAdmin;
use crate::api::state::AppState;
use crate::api::types::{ApiError, CreateFeatureBody, Json, ListResponse, UpdateFeatureBody};
use crate::domain::{Feature, FeatureId, ProjectId};

/// GET /admin/projects/{project_id}/features
pub async fn list_features(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(project_id): Path<String>,
) -> Result<Json<ListResponse<Feature>>, ApiError> {
    let project_id: ProjectId = project_id.parse()?;

    Ok(Json(state.feature_service.list(project_id).await?.into()))
}

/// POST /admin/projects/{project_id}/features
pub async fn create_feature(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(project_id): Path<String>,
    Json(body): Json<CreateFeatureBody>,
) -> Result<(StatusCode, Json<Feature>), ApiError> {
    let project_id: ProjectId = project_id.parse()?;
    debug!(project_id = %project_id, code = %body.code, "Admin creating feature");

    let feature = state.feature_service.create(project_id, body.into()).await?;
    Ok((StatusCode::CREATED, Json(feature)))
}

/// GET /admin/projects/{project_id}/features/{feature_id}
pub async fn get_feature(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path((project_id, feature_id)): Path<(String, String)>,
) -> Result<Json<Feature>, ApiError> {
    let project_id: ProjectId = project_id.parse()?;
    let feature_id: FeatureId = feature_id.parse()?;

    Ok(Json(state.feature_service.get(project_id, feature_id).await?))
}

/// PUT /admin/projects/{project_id}/features/{feature_id}
pub async fn update_feature(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path((project_id, feature_id)): Path<(String, String)>,
    Json(body): Json<UpdateFeatureBody>,
) -> Result<Json<Feature>, ApiError> {
    let project_id: ProjectId = project_id.parse()?;
    let feature_id: FeatureId = feature_id.parse()?;

    let feature = state
        .feature_service
        .update(project_id, feature_id, body.into())
        .await?;
    Ok(Json(feature))
}
