//! In-memory plan repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{DomainError, Plan, PlanId, PlanRepository, PlanUpdate, ProjectId};

/// In-memory implementation of PlanRepository
///
/// All writes for every project go through one write lock, which makes
/// demote-then-write a single atomic step.
#[derive(Debug, Default)]
pub struct InMemoryPlanRepository {
    plans: Arc<RwLock<HashMap<PlanId, Plan>>>,
}

impl InMemoryPlanRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn demote_defaults(plans: &mut HashMap<PlanId, Plan>, project_id: ProjectId, keep: PlanId) {
    for other in plans.values_mut() {
        if other.project_id() == project_id && other.id() != keep && other.is_default() {
            other.set_default(false);
        }
    }
}

#[async_trait]
impl PlanRepository for InMemoryPlanRepository {
    async fn get(&self, project_id: ProjectId, plan_id: PlanId) -> Result<Option<Plan>, DomainError> {
        let plans = self.plans.read().await;
        Ok(plans
            .get(&plan_id)
            .filter(|p| p.project_id() == project_id)
            .cloned())
    }

    async fn find(&self, plan_id: PlanId) -> Result<Option<Plan>, DomainError> {
        let plans = self.plans.read().await;
        Ok(plans.get(&plan_id).cloned())
    }

    async fn get_by_code(&self, project_id: ProjectId, code: &str) -> Result<Option<Plan>, DomainError> {
        let plans = self.plans.read().await;
        Ok(plans
            .values()
            .find(|p| p.project_id() == project_id && p.code() == code)
            .cloned())
    }

    async fn find_default(&self, project_id: ProjectId) -> Result<Option<Plan>, DomainError> {
        let plans = self.plans.read().await;
        Ok(plans
            .values()
            .find(|p| p.project_id() == project_id && p.is_default())
            .cloned())
    }

    async fn list(&self, project_id: ProjectId, include_inactive: bool) -> Result<Vec<Plan>, DomainError> {
        let plans = self.plans.read().await;

        let mut result: Vec<Plan> = plans
            .values()
            .filter(|p| p.project_id() == project_id && (include_inactive || p.is_active()))
            .cloned()
            .collect();
        result.sort_by(|a, b| {
            b.is_default()
                .cmp(&a.is_default())
                .then_with(|| b.created_at().cmp(&a.created_at()))
        });

        Ok(result)
    }

    async fn create(&self, mut plan: Plan) -> Result<Plan, DomainError> {
        let mut plans = self.plans.write().await;
        let project_id = plan.project_id();

        if plans
            .values()
            .any(|p| p.project_id() == project_id && p.code() == plan.code())
        {
            return Err(DomainError::duplicate_code("plan", plan.code()));
        }

        let has_default = plans
            .values()
            .any(|p| p.project_id() == project_id && p.is_default());

        if !has_default && !plan.is_default() {
            plan = plan.with_default(true);
        }
        plan.ensure_default_is_active()?;

        if plan.is_default() {
            demote_defaults(&mut plans, project_id, plan.id());
        }

        plans.insert(plan.id(), plan.clone());
        Ok(plan)
    }

    async fn update(
        &self,
        project_id: ProjectId,
        plan_id: PlanId,
        changes: PlanUpdate,
    ) -> Result<Plan, DomainError> {
        let mut plans = self.plans.write().await;

        let mut plan = plans
            .get(&plan_id)
            .filter(|p| p.project_id() == project_id)
            .cloned()
            .ok_or_else(|| DomainError::plan_not_found(plan_id))?;

        plan.apply(&changes)?;

        if changes.promotes() {
            demote_defaults(&mut plans, project_id, plan_id);
        }

        plans.insert(plan_id, plan.clone());
        Ok(plan)
    }
}
