//! Admin API endpoints, guarded by the admin key

pub mod api_keys;
pub mod features;
pub mod plans;
pub mod projects;
pub mod tenants;

use axum::{
    routing::{get, patch, post},
    Router,
};

use super::state::AppState;

/// Create admin API router
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        // Project registry
        .route(
            "/projects",
            get(projects::list_projects).post(projects::create_project),
        )
        .route(
            "/projects/{project_id}",
            get(projects::get_project).put(projects::update_project),
        )
        // API keys
        .route(
            "/projects/{project_id}/api-keys",
            get(api_keys::list_api_keys).post(api_keys::create_api_key),
        )
        .route(
            "/projects/{project_id}/api-keys/rotate",
            post(api_keys::rotate_api_key),
        )
        .route(
            "/projects/{project_id}/api-keys/revoke",
            post(api_keys::revoke_api_keys),
        )
        // Plans and their feature values
        .route(
            "/projects/{project_id}/plans",
            get(plans::list_plans).post(plans::create_plan),
        )
        .route(
            "/projects/{project_id}/plans/{plan_id}",
            get(plans::get_plan).put(plans::update_plan),
        )
        .route(
            "/projects/{project_id}/plans/{plan_id}/features",
            get(plans::list_plan_features).post(plans::assign_plan_feature),
        )
        // Features
        .route(
            "/projects/{project_id}/features",
            get(features::list_features).post(features::create_feature),
        )
        .route(
            "/projects/{project_id}/features/{feature_id}",
            get(features::get_feature).put(features::update_feature),
        )
        // Tenant assignments
        .route(
            "/tenants/{tenant_id}/assignments",
            get(tenants::list_assignments).post(tenants::create_assignment),
        )
        .route(
            "/tenants/{tenant_id}/assignments/{assignment_id}",
            patch(tenants::update_assignment),
        )
}
