//! Project API key admin endpoints

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::debug;

use crate::api::middleware::RequireAdmin;
use crate::api::state::AppState;
use crate::api::types::{
    parse_optional_body, ApiError, Json, ListResponse, RevokeKeysBody, RevokeKeysResponse,
};
use crate::domain::{ApiKey, ProjectId};
use crate::infrastructure::api_key::IssuedApiKey;

/// GET /admin/projects/{project_id}/api-keys
pub async fn list_api_keys(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(project_id): Path<String>,
) -> Result<Json<ListResponse<ApiKey>>, ApiError> {
    let project_id: ProjectId = project_id.parse()?;
    debug!(project_id = %project_id, "Admin listing API keys");

    let keys = state.api_key_service.list_keys(project_id).await?;
    Ok(Json(keys.into()))
}

/// POST /admin/projects/{project_id}/api-keys
///
/// The raw key is only present in this response.
pub async fn create_api_key(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(project_id): Path<String>,
) -> Result<(StatusCode, Json<IssuedApiKey>), ApiError> {
    let project_id: ProjectId = project_id.parse()?;

    let issued = state.api_key_service.create_key(project_id).await?;
    Ok((StatusCode::CREATED, Json(issued)))
}

/// POST /admin/projects/{project_id}/api-keys/rotate
pub async fn rotate_api_key(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(project_id): Path<String>,
) -> Result<(StatusCode, Json<IssuedApiKey>), ApiError> {
    let project_id: ProjectId = project_id.parse()?;

    let issued = state.api_key_service.rotate_key(project_id).await?;
    Ok((StatusCode::CREATED, Json(issued)))
}

/// POST /admin/projects/{project_id}/api-keys/revoke
///
/// The body is optional; without a `key_prefix` every active key is revoked.
pub async fn revoke_api_keys(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(project_id): Path<String>,
    body: Bytes,
) -> Result<Json<RevokeKeysResponse>, ApiError> {
    let project_id: ProjectId = project_id.parse()?;

    let key_prefix = parse_optional_body::<RevokeKeysBody>(&body)?.and_then(|b| b.key_prefix);

    let revoked = state
        .api_key_service
        .revoke_key(project_id, key_prefix.as_deref())
        .await?;

    Ok(Json(RevokeKeysResponse { revoked }))
}
