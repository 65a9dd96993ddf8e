//! Tenant plan entity and the effective plan view

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::id::{PlanId, ProjectId, TenantId, TenantPlanId};
use crate::domain::plan::Plan;

/// Explicit plan assignment of a tenant within a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantPlan {
    id: TenantPlanId,
    tenant_id: TenantId,
    project_id: ProjectId,
    plan_id: PlanId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TenantPlan {
    pub fn new(id: TenantPlanId, tenant_id: TenantId, project_id: ProjectId, plan_id: PlanId) -> Self {
        let now = Utc::now();

        Self {
            id,
            tenant_id,
            project_id,
            plan_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    pub fn id(&self) -> TenantPlanId {
        self.id
    }

    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    pub fn plan_id(&self) -> PlanId {
        self.plan_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn set_plan_id(&mut self, plan_id: PlanId) {
        self.plan_id = plan_id;
        self.updated_at = Utc::now();
    }
}

/// Where an effective plan came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentSource {
    /// A persisted tenant plan
    Assigned,
    /// The project's default plan, no assignment stored
    Default,
}

/// The plan actually governing a tenant for a project
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectivePlan {
    pub tenant_id: TenantId,
    pub project_id: ProjectId,
    /// `None` for the synthetic default assignment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignment_id: Option<TenantPlanId>,
    pub source: AssignmentSource,
    pub plan: Plan,
}

impl EffectivePlan {
    /// Effective plan backed by a stored assignment
    pub fn assigned(tenant_plan: &TenantPlan, plan: Plan) -> Self {
        Self {
            tenant_id: tenant_plan.tenant_id().clone(),
            project_id: tenant_plan.project_id(),
            assignment_id: Some(tenant_plan.id()),
            source: AssignmentSource::Assigned,
            plan,
        }
    }

    /// Synthetic, non-persisted assignment to the project's default plan
    pub fn fallback(tenant_id: TenantId, plan: Plan) -> Self {
        Self {
            tenant_id,
            project_id: plan.project_id(),
            assignment_id: None,
            source: AssignmentSource::Default,
            plan,
        }
    }

    pub fn plan_id(&self) -> PlanId {
        self.plan.id()
    }

    pub fn is_fallback(&self) -> bool {
        self.source == AssignmentSource::Default
    }
}

/// Effective plan of a tenant together with the feature values it grants
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entitlements {
    #[serde(flatten)]
    pub effective: EffectivePlan,
    /// Feature values keyed by feature code
    pub features: BTreeMap<String, Value>,
}
