//! In-memory plan-feature repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{
    DomainError, FeatureId, PlanFeature, PlanFeatureRepository, PlanId, ProjectId,
};

/// In-memory implementation of PlanFeatureRepository, keyed by (plan, feature)
#[derive(Debug, Default)]
pub struct InMemoryPlanFeatureRepository {
    assignments: Arc<RwLock<HashMap<(PlanId, FeatureId), PlanFeature>>>,
}

impl InMemoryPlanFeatureRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlanFeatureRepository for InMemoryPlanFeatureRepository {
    async fn create(&self, plan_feature: PlanFeature) -> Result<PlanFeature, DomainError> {
        let mut assignments = self.assignments.write().await;
        let key = (plan_feature.plan_id(), plan_feature.feature_id());

        if assignments.contains_key(&key) {
            return Err(DomainError::duplicate_assignment(key.0, key.1));
        }

        assignments.insert(key, plan_feature.clone());
        Ok(plan_feature)
    }

    async fn list_by_plan(&self, project_id: ProjectId, plan_id: PlanId) -> Result<Vec<PlanFeature>, DomainError> {
        let assignments = self.assignments.read().await;

        let mut result: Vec<PlanFeature> = assignments
            .values()
            .filter(|a| a.project_id() == project_id && a.plan_id() == plan_id)
            .cloned()
            .collect();
        result.sort_by_key(|a| a.created_at());

        Ok(result)
    }
}
