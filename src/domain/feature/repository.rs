//! Feature repository trait

use async_trait::async_trait;
use std::fmt::Debug;

#[cfg(test)]
use mockall::automock;

use super::entity::{Feature, FeatureUpdate};
use crate::domain::id::{FeatureId, ProjectId};
use crate::domain::DomainError;

/// Repository trait for feature storage
///
/// Codes are unique per project; a collision is reported as `DuplicateCode`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FeatureRepository: Send + Sync + Debug {
    /// Get a feature owned by the given project
    async fn get(&self, project_id: ProjectId, feature_id: FeatureId) -> Result<Option<Feature>, DomainError>;

    /// Get a feature regardless of its owning project
    async fn find(&self, feature_id: FeatureId) -> Result<Option<Feature>, DomainError>;

    /// Get a feature by normalized code within the project
    async fn get_by_code(&self, project_id: ProjectId, code: &str) -> Result<Option<Feature>, DomainError>;

    /// List features of the project, newest first
    async fn list(&self, project_id: ProjectId, include_inactive: bool) -> Result<Vec<Feature>, DomainError>;

    /// Create a new feature
    async fn create(&self, feature: Feature) -> Result<Feature, DomainError>;

    /// Apply a partial update to a feature of the project, atomically
    async fn update(
        &self,
        project_id: ProjectId,
        feature_id: FeatureId,
        changes: FeatureUpdate,
    ) -> Result<Feature, DomainError>;
}
