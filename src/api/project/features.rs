//! Feature endpoints of the project API

use axum::{
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::middleware::RequireProject;
use crate::api::state::AppState;
use crate::api::types::{ApiError, CreateFeatureBody, Json, ListResponse, UpdateFeatureBody};
use crate::domain::{Feature, FeatureId};

/// GET /api/features
pub async fn list_features(
    State(state): State<AppState>,
    RequireProject(project_id): RequireProject,
) -> Result<Json<ListResponse<Feature>>, ApiError> {
    Ok(Json(state.feature_service.list(project_id).await?.into()))
}

/// POST /api/features
pub async fn create_feature(
    State(state): State<AppState>,
    RequireProject(project_id): RequireProject,
    Json(body): Json<CreateFeatureBody>,
) -> Result<(StatusCode, Json<Feature>), ApiError> {
    let feature = state.feature_service.create(project_id, body.into()).await?;
    Ok((StatusCode::CREATED, Json(feature)))
}

/// GET /api/features/{feature_id}
pub async fn get_feature(
    State(state): State<AppState>,
    RequireProject(project_id): RequireProject,
    Path(feature_id): Path<String>,
) -> Result<Json<Feature>, ApiError> {
    let feature_id: FeatureId = feature_id.parse()?;

    Ok(Json(state.feature_service.get(project_id, feature_id).await?))
}

/// PUT /api/features/{feature_id}
pub async fn update_feature(
    State(state): State<AppState>,
    RequireProject(project_id): RequireProject,
    Path(feature_id): Path<String>,
    Json(body): Json<UpdateFeatureBody>,
) -> Result<Json<Feature>, ApiError> {
    let feature_id: FeatureId = feature_id.parse()?;

    let feature = state
        .feature_service
        .update(project_id, feature_id, body.into())
        .await?;
    Ok(Json(feature))
}
