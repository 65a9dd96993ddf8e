//! Project registry admin endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use tracing::debug;

use crate::api::middleware::RequireAdmin;
use crate::api::state::AppState;
use crate::api::types::{ApiError, CreateProjectBody, Json, ListResponse, UpdateProjectBody};
use crate::domain::{Project, ProjectId};

/// GET /admin/projects
pub async fn list_projects(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<ListResponse<Project>>, ApiError> {
    debug!("Admin listing projects");

    let projects = state.project_service.list().await?;
    Ok(Json(projects.into()))
}

/// POST /admin/projects
pub async fn create_project(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(body): Json<CreateProjectBody>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    debug!(code = %body.code, "Admin creating project");

    let project = state.project_service.create(body.into()).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /admin/projects/{project_id}
pub async fn get_project(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(project_id): Path<String>,
) -> Result<Json<Project>, ApiError> {
    let project_id: ProjectId = project_id.parse()?;

    Ok(Json(state.project_service.get(project_id).await?))
}

/// PUT /admin/projects/{project_id}
pub async fn update_project(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(project_id): Path<String>,
    Json(body): Json<UpdateProjectBody>,
) -> Result<Json<Project>, ApiError> {
    let project_id: ProjectId = project_id.parse()?;
    debug!(project_id = %project_id, "Admin updating project");

    Ok(Json(state.project_service.update(project_id, body.into()).await?))
}
