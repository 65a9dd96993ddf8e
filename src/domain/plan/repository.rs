//! Plan repository trait

use async_trait::async_trait;
use std::fmt::Debug;

#[cfg(test)]
use mockall::automock;

use super::entity::{Plan, PlanUpdate};
use crate::domain::id::{PlanId, ProjectId};
use crate::domain::DomainError;

/// Repository trait for plan storage
///
/// `create` and `update` maintain the single-default invariant atomically per
/// project. A created default plan, or an update whose changes promote the
/// plan, demotes every other default plan of the project in the same unit of
/// work. When a plan is created in a project that has no default plan yet, it
/// is stored as the default. `update` applies [`PlanUpdate`] to the row read
/// inside that same unit of work.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PlanRepository: Send + Sync + Debug {
    /// Get a plan owned by the given project
    async fn get(&self, project_id: ProjectId, plan_id: PlanId) -> Result<Option<Plan>, DomainError>;

    /// Get a plan regardless of its owning project
    async fn find(&self, plan_id: PlanId) -> Result<Option<Plan>, DomainError>;

    /// Get a plan by normalized code within the project
    async fn get_by_code(&self, project_id: ProjectId, code: &str) -> Result<Option<Plan>, DomainError>;

    /// Get the default plan of the project, if any
    async fn find_default(&self, project_id: ProjectId) -> Result<Option<Plan>, DomainError>;

    /// List plans of the project, default first then newest first
    async fn list(&self, project_id: ProjectId, include_inactive: bool) -> Result<Vec<Plan>, DomainError>;

    /// Create a plan, returning the stored record (with its effective default flag)
    async fn create(&self, plan: Plan) -> Result<Plan, DomainError>;

    /// Apply a partial update, demoting other defaults when it promotes the plan
    async fn update(
        &self,
        project_id: ProjectId,
        plan_id: PlanId,
        changes: PlanUpdate,
    ) -> Result<Plan, DomainError>;
}
