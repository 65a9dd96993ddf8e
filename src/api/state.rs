//! Application state for shared services

use std::sync::Arc;

use crate::domain::{DomainError, IdGenerator, UuidGenerator};
use crate::infrastructure::api_key::ApiKeyService;
use crate::infrastructure::feature::FeatureService;
use crate::infrastructure::plan::PlanService;
use crate::infrastructure::plan_feature::PlanFeatureService;
use crate::infrastructure::project::ProjectService;
use crate::infrastructure::storage::Repositories;
use crate::infrastructure::tenant_plan::TenantPlanService;

/// Application state containing shared services
#[derive(Debug, Clone)]
pub struct AppState {
    pub project_service: Arc<ProjectService>,
    pub plan_service: Arc<PlanService>,
    pub feature_service: Arc<FeatureService>,
    pub plan_feature_service: Arc<PlanFeatureService>,
    pub tenant_plan_service: Arc<TenantPlanService>,
    pub api_key_service: Arc<ApiKeyService>,
    repositories: Repositories,
    admin_key: Option<Arc<str>>,
}

impl AppState {
    /// Wire every service on top of one repository set
    pub fn new(repositories: Repositories, ids: Arc<dyn IdGenerator>) -> Self {
        let r = &repositories;

        Self {
            project_service: Arc::new(ProjectService::new(r.projects.clone(), ids.clone())),
            plan_service: Arc::new(PlanService::new(
                r.projects.clone(),
                r.plans.clone(),
                ids.clone(),
            )),
            feature_service: Arc::new(FeatureService::new(
                r.projects.clone(),
                r.features.clone(),
                ids.clone(),
            )),
            plan_feature_service: Arc::new(PlanFeatureService::new(
                r.projects.clone(),
                r.plans.clone(),
                r.features.clone(),
                r.plan_features.clone(),
                ids.clone(),
            )),
            tenant_plan_service: Arc::new(TenantPlanService::new(
                r.projects.clone(),
                r.plans.clone(),
                r.features.clone(),
                r.plan_features.clone(),
                r.tenant_plans.clone(),
                ids.clone(),
            )),
            api_key_service: Arc::new(ApiKeyService::new(
                r.projects.clone(),
                r.api_keys.clone(),
                ids,
            )),
            repositories,
            admin_key: None,
        }
    }

    /// In-memory state with UUID v4 identifiers
    pub fn in_memory() -> Self {
        Self::new(Repositories::in_memory(), Arc::new(UuidGenerator))
    }

    /// Set the key protecting admin routes
    pub fn with_admin_key(mut self, admin_key: Option<String>) -> Self {
        self.admin_key = admin_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .map(Arc::from);
        self
    }

    pub fn admin_key(&self) -> Option<&str> {
        self.admin_key.as_deref()
    }

    /// Check the backing store is reachable
    pub async fn ping_storage(&self) -> Result<(), DomainError> {
        self.repositories.ping().await
    }
}
