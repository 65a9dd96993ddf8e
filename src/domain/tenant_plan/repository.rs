//! Tenant plan repository trait

use async_trait::async_trait;
use std::fmt::Debug;

#[cfg(test)]
use mockall::automock;

use super::entity::TenantPlan;
use crate::domain::id::{ProjectId, TenantId, TenantPlanId};
use crate::domain::DomainError;

/// Repository trait for tenant plan assignments
///
/// At most one assignment exists per (tenant, project).
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TenantPlanRepository: Send + Sync + Debug {
    /// Get an assignment by ID
    async fn get(&self, id: TenantPlanId) -> Result<Option<TenantPlan>, DomainError>;

    /// Get the assignment of a tenant in a project
    async fn get_by_tenant_and_project(
        &self,
        tenant_id: &TenantId,
        project_id: ProjectId,
    ) -> Result<Option<TenantPlan>, DomainError>;

    /// List every assignment of a tenant, newest first
    async fn list_by_tenant(&self, tenant_id: &TenantId) -> Result<Vec<TenantPlan>, DomainError>;

    /// Insert a new assignment, failing with `AlreadyAssigned` when the tenant
    /// already has one in the project
    async fn create(&self, tenant_plan: TenantPlan) -> Result<TenantPlan, DomainError>;

    /// Change the plan of an existing assignment
    async fn update(&self, tenant_plan: &TenantPlan) -> Result<TenantPlan, DomainError>;

    /// Insert the assignment or replace the plan of the existing one for the
    /// same (tenant, project) in a single write. The stored record is returned;
    /// on replacement it keeps its original ID.
    async fn upsert(&self, tenant_plan: TenantPlan) -> Result<TenantPlan, DomainError>;
}
