//! Plan-feature repository trait

use async_trait::async_trait;
use std::fmt::Debug;

#[cfg(test)]
use mockall::automock;

use super::entity::PlanFeature;
use crate::domain::id::{PlanId, ProjectId};
use crate::domain::DomainError;

/// Repository trait for plan-feature assignments
///
/// At most one assignment exists per (plan, feature); a second insert for the
/// same pair fails with `DuplicateAssignment`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PlanFeatureRepository: Send + Sync + Debug {
    /// Create an assignment
    async fn create(&self, plan_feature: PlanFeature) -> Result<PlanFeature, DomainError>;

    /// List assignments of a plan, oldest first
    async fn list_by_plan(&self, project_id: ProjectId, plan_id: PlanId) -> Result<Vec<PlanFeature>, DomainError>;
}
