//! Project repository trait

use async_trait::async_trait;
use std::fmt::Debug;

#[cfg(test)]
use mockall::automock;

use super::entity::{Project, ProjectUpdate};
use crate::domain::id::ProjectId;
use crate::domain::DomainError;

/// Repository trait for project storage
///
/// Implementations enforce code uniqueness as a hard constraint and report
/// violations as `DomainError::DuplicateCode`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync + Debug {
    /// Get a project by ID
    async fn get(&self, id: ProjectId) -> Result<Option<Project>, DomainError>;

    /// Get a project by its normalized code
    async fn get_by_code(&self, code: &str) -> Result<Option<Project>, DomainError>;

    /// Create a new project
    async fn create(&self, project: Project) -> Result<Project, DomainError>;

    /// Apply a partial update to the stored project and return the result
    ///
    /// The read and the write are atomic, so concurrent updates of different
    /// fields do not overwrite each other.
    async fn update(&self, id: ProjectId, changes: ProjectUpdate) -> Result<Project, DomainError>;

    /// List projects, newest first
    async fn list(&self, include_inactive: bool) -> Result<Vec<Project>, DomainError>;
}
