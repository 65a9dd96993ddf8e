//! In-memory tenant plan repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{
    DomainError, ProjectId, TenantId, TenantPlan, TenantPlanId, TenantPlanRepository,
};

/// In-memory implementation of TenantPlanRepository
#[derive(Debug, Default)]
pub struct InMemoryTenantPlanRepository {
    assignments: Arc<RwLock<HashMap<TenantPlanId, TenantPlan>>>,
}

impl InMemoryTenantPlanRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn find_for<'a>(
    assignments: &'a HashMap<TenantPlanId, TenantPlan>,
    tenant_id: &TenantId,
    project_id: ProjectId,
) -> Option<&'a TenantPlan> {
    assignments
        .values()
        .find(|a| a.tenant_id() == tenant_id && a.project_id() == project_id)
}

#[async_trait]
impl TenantPlanRepository for InMemoryTenantPlanRepository {
    async fn get(&self, id: TenantPlanId) -> Result<Option<TenantPlan>, DomainError> {
        let assignments = self.assignments.read().await;
        Ok(assignments.get(&id).cloned())
    }

    async fn get_by_tenant_and_project(
        &self,
        tenant_id: &TenantId,
        project_id: ProjectId,
    ) -> Result<Option<TenantPlan>, DomainError> {
        let assignments = self.assignments.read().await;
        Ok(find_for(&assignments, tenant_id, project_id).cloned())
    }

    async fn list_by_tenant(&self, tenant_id: &TenantId) -> Result<Vec<TenantPlan>, DomainError> {
        let assignments = self.assignments.read().await;

        let mut result: Vec<TenantPlan> = assignments
            .values()
            .filter(|a| a.tenant_id() == tenant_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        Ok(result)
    }

    async fn create(&self, tenant_plan: TenantPlan) -> Result<TenantPlan, DomainError> {
        let mut assignments = self.assignments.write().await;

        if find_for(&assignments, tenant_plan.tenant_id(), tenant_plan.project_id()).is_some() {
            return Err(DomainError::already_assigned(
                tenant_plan.tenant_id(),
                tenant_plan.project_id(),
            ));
        }

        assignments.insert(tenant_plan.id(), tenant_plan.clone());
        Ok(tenant_plan)
    }

    async fn update(&self, tenant_plan: &TenantPlan) -> Result<TenantPlan, DomainError> {
        let mut assignments = self.assignments.write().await;

        match assignments.get_mut(&tenant_plan.id()) {
            Some(existing) => {
                *existing = tenant_plan.clone();
                Ok(tenant_plan.clone())
            }
            None => Err(DomainError::not_found(format!(
                "Assignment '{}' not found",
                tenant_plan.id()
            ))),
        }
    }

    async fn upsert(&self, tenant_plan: TenantPlan) -> Result<TenantPlan, DomainError> {
        let mut assignments = self.assignments.write().await;

        let existing_id = find_for(&assignments, tenant_plan.tenant_id(), tenant_plan.project_id())
            .map(|a| a.id());

        match existing_id.and_then(|id| assignments.get_mut(&id)) {
            Some(existing) => {
                existing.set_plan_id(tenant_plan.plan_id());
                Ok(existing.clone())
            }
            None => {
                assignments.insert(tenant_plan.id(), tenant_plan.clone());
                Ok(tenant_plan)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PlanId;
    use uuid::Uuid;

    fn assignment(tenant: &str, project_id: ProjectId, plan_id: PlanId) -> TenantPlan {
        TenantPlan::new(
            TenantPlanId::from_uuid(Uuid::new_v4()),
            TenantId::new(tenant).unwrap(),
            project_id,
            plan_id,
        )
    }

    #[tokio::test]
    async fn test_create_rejects_second_assignment() {
        let repo = InMemoryTenantPlanRepository::new();
        let project_id = ProjectId::from_uuid(Uuid::new_v4());

        repo.create(assignment("t1", project_id, PlanId::from_uuid(Uuid::new_v4())))
            .await
            .unwrap();
        let err = repo
            .create(assignment("t1", project_id, PlanId::from_uuid(Uuid::new_v4())))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::AlreadyAssigned { .. }));
    }

    #[tokio::test]
    async fn test_upsert_replaces_plan_and_keeps_id() {
        let repo = InMemoryTenantPlanRepository::new();
        let project_id = ProjectId::from_uuid(Uuid::new_v4());
        let first_plan = PlanId::from_uuid(Uuid::new_v4());
        let second_plan = PlanId::from_uuid(Uuid::new_v4());

        let first = repo
            .upsert(assignment("t1", project_id, first_plan))
            .await
            .unwrap();
        let second = repo
            .upsert(assignment("t1", project_id, second_plan))
            .await
            .unwrap();

        assert_eq!(first.id(), second.id());
        assert_eq!(second.plan_id(), second_plan);
        assert_eq!(
            repo.list_by_tenant(&TenantId::new("t1").unwrap())
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
