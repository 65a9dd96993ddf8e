//! Project API - every route acts on the project owning the presented key

pub mod features;
pub mod plans;
pub mod tenants;

use axum::{routing::get, Router};

use super::state::AppState;

/// Create project API router
pub fn create_project_router() -> Router<AppState> {
    Router::new()
        .route("/plans", get(plans::list_plans).post(plans::create_plan))
        .route(
            "/plans/{plan_id}",
            get(plans::get_plan).put(plans::update_plan),
        )
        .route(
            "/plans/{plan_id}/features",
            get(plans::list_plan_features).post(plans::assign_plan_feature),
        )
        .route(
            "/features",
            get(features::list_features).post(features::create_feature),
        )
        .route(
            "/features/{feature_id}",
            get(features::get_feature).put(features::update_feature),
        )
        .route(
            "/tenants/{tenant_id}/plan",
            get(tenants::get_tenant_plan).put(tenants::put_tenant_plan),
        )
        .route(
            "/tenants/{tenant_id}/entitlements",
            get(tenants::get_entitlements),
        )
}
