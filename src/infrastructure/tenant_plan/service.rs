//! Tenant plan service - assignments and effective plan resolution

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{
    normalize_code, DomainError, EffectivePlan, Entitlements, FeatureRepository, IdGenerator,
    Plan, PlanFeatureRepository, PlanId, PlanRepository, ProjectId, ProjectRepository, TenantId,
    TenantPlan, TenantPlanId, TenantPlanRepository,
};
use crate::infrastructure::ownership::{require_plan_of_project, require_project};

/// Tenant entitlement resolver
#[derive(Debug)]
pub struct TenantPlanService {
    projects: Arc<dyn ProjectRepository>,
    plans: Arc<dyn PlanRepository>,
    features: Arc<dyn FeatureRepository>,
    plan_features: Arc<dyn PlanFeatureRepository>,
    tenant_plans: Arc<dyn TenantPlanRepository>,
    ids: Arc<dyn IdGenerator>,
}

impl TenantPlanService {
    pub fn new(
        projects: Arc<dyn ProjectRepository>,
        plans: Arc<dyn PlanRepository>,
        features: Arc<dyn FeatureRepository>,
        plan_features: Arc<dyn PlanFeatureRepository>,
        tenant_plans: Arc<dyn TenantPlanRepository>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            projects,
            plans,
            features,
            plan_features,
            tenant_plans,
            ids,
        }
    }

    /// All persisted assignments of a tenant
    pub async fn list_assignments(&self, tenant_id: &TenantId) -> Result<Vec<TenantPlan>, DomainError> {
        debug!(tenant_id = %tenant_id, "Listing tenant assignments");
        self.tenant_plans.list_by_tenant(tenant_id).await
    }

    /// Assign a plan by project and plan code
    ///
    /// A tenant holds one assignment per project; use [`Self::reassign`] or
    /// [`Self::upsert`] to change it.
    pub async fn assign(
        &self,
        tenant_id: TenantId,
        project_code: &str,
        plan_code: &str,
    ) -> Result<TenantPlan, DomainError> {
        let project_code = normalize_code(project_code);
        let plan_code = normalize_code(plan_code);

        if project_code.is_empty() || plan_code.is_empty() {
            return Err(DomainError::validation("project and plan codes are required"));
        }

        let project = self
            .projects
            .get_by_code(&project_code)
            .await?
            .ok_or_else(|| DomainError::project_not_found(&project_code))?;

        let plan = self.plan_by_code(project.id(), &plan_code).await?;

        if self
            .tenant_plans
            .get_by_tenant_and_project(&tenant_id, project.id())
            .await?
            .is_some()
        {
            return Err(DomainError::already_assigned(&tenant_id, &project_code));
        }

        info!(
            tenant_id = %tenant_id,
            project = %project_code,
            plan = %plan_code,
            "Assigning plan to tenant"
        );

        let tenant_plan = TenantPlan::new(
            TenantPlanId::from_uuid(self.ids.next_id()),
            tenant_id,
            project.id(),
            plan.id(),
        );

        self.tenant_plans.create(tenant_plan).await
    }

    /// Move an existing assignment to another plan of the same project
    pub async fn reassign(
        &self,
        tenant_id: &TenantId,
        assignment_id: TenantPlanId,
        plan_code: &str,
    ) -> Result<TenantPlan, DomainError> {
        let mut assignment = self
            .tenant_plans
            .get(assignment_id)
            .await?
            .filter(|a| a.tenant_id() == tenant_id)
            .ok_or_else(|| {
                DomainError::not_found(format!("Assignment '{}' not found", assignment_id))
            })?;

        let plan = self
            .plan_by_code(assignment.project_id(), &normalize_code(plan_code))
            .await?;

        assignment.set_plan_id(plan.id());
        let updated = self.tenant_plans.update(&assignment).await?;

        info!(
            tenant_id = %tenant_id,
            assignment_id = %assignment_id,
            plan = %plan.code(),
            "Tenant plan reassigned"
        );
        Ok(updated)
    }

    /// Insert or replace the tenant's assignment for the project in one write
    pub async fn upsert(
        &self,
        tenant_id: TenantId,
        project_id: ProjectId,
        plan_id: PlanId,
    ) -> Result<TenantPlan, DomainError> {
        require_project(self.projects.as_ref(), project_id).await?;
        let plan = require_plan_of_project(self.plans.as_ref(), project_id, plan_id).await?;
        ensure_assignable(&plan)?;

        info!(
            tenant_id = %tenant_id,
            project_id = %project_id,
            plan = %plan.code(),
            "Upserting tenant plan"
        );

        let tenant_plan = TenantPlan::new(
            TenantPlanId::from_uuid(self.ids.next_id()),
            tenant_id,
            project_id,
            plan_id,
        );

        self.tenant_plans.upsert(tenant_plan).await
    }

    /// Resolve the plan governing a tenant in a project
    ///
    /// An explicit assignment wins; otherwise the project's default plan is
    /// returned as a synthetic assignment. With neither, no plan is available.
    pub async fn resolve(
        &self,
        tenant_id: &TenantId,
        project_id: ProjectId,
    ) -> Result<EffectivePlan, DomainError> {
        debug!(tenant_id = %tenant_id, project_id = %project_id, "Resolving tenant plan");

        require_project(self.projects.as_ref(), project_id).await?;

        if let Some(assignment) = self
            .tenant_plans
            .get_by_tenant_and_project(tenant_id, project_id)
            .await?
        {
            let plan = self
                .plans
                .get(project_id, assignment.plan_id())
                .await?
                .ok_or_else(|| {
                    DomainError::internal(format!(
                        "Assignment '{}' references missing plan '{}'",
                        assignment.id(),
                        assignment.plan_id()
                    ))
                })?;

            return Ok(EffectivePlan::assigned(&assignment, plan));
        }

        match self.plans.find_default(project_id).await? {
            Some(plan) => Ok(EffectivePlan::fallback(tenant_id.clone(), plan)),
            None => Err(DomainError::no_plan_available(tenant_id, project_id)),
        }
    }

    /// Effective plan plus its active feature values keyed by feature code
    pub async fn entitlements(
        &self,
        tenant_id: &TenantId,
        project_id: ProjectId,
    ) -> Result<Entitlements, DomainError> {
        let effective = self.resolve(tenant_id, project_id).await?;

        let plan_features = self
            .plan_features
            .list_by_plan(project_id, effective.plan_id())
            .await?;

        let codes: HashMap<_, _> = self
            .features
            .list(project_id, false)
            .await?
            .into_iter()
            .map(|f| (f.id(), f.code().to_string()))
            .collect();

        let features: BTreeMap<String, serde_json::Value> = plan_features
            .into_iter()
            .filter_map(|pf| {
                codes
                    .get(&pf.feature_id())
                    .map(|code| (code.clone(), pf.value().clone()))
            })
            .collect();

        Ok(Entitlements {
            effective,
            features,
        })
    }

    async fn plan_by_code(&self, project_id: ProjectId, code: &str) -> Result<Plan, DomainError> {
        let plan = self
            .plans
            .get_by_code(project_id, code)
            .await?
            .ok_or_else(|| DomainError::plan_not_found(code))?;

        ensure_assignable(&plan)?;
        Ok(plan)
    }
}

fn ensure_assignable(plan: &Plan) -> Result<(), DomainError> {
    if !plan.is_active() {
        return Err(DomainError::validation(format!(
            "plan '{}' is inactive",
            plan.code()
        )));
    }
    Ok(())
}
