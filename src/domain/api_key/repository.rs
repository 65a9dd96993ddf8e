//! API key repository trait

use async_trait::async_trait;
use std::fmt::Debug;

#[cfg(test)]
use mockall::automock;

use super::entity::ApiKey;
use crate::domain::id::ProjectId;
use crate::domain::DomainError;

/// Repository trait for API key storage
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ApiKeyRepository: Send + Sync + Debug {
    /// Revoke every active key of the key's project and insert the new key,
    /// as one atomic unit
    async fn replace_active(&self, api_key: ApiKey) -> Result<ApiKey, DomainError>;

    /// Revoke every active key of the project, returning how many were revoked
    async fn revoke_all(&self, project_id: ProjectId) -> Result<u64, DomainError>;

    /// Revoke active keys of the project with the given prefix, returning how
    /// many were revoked
    async fn revoke_by_prefix(&self, project_id: ProjectId, key_prefix: &str) -> Result<u64, DomainError>;

    /// Find a non-revoked key by its digest
    async fn get_active_by_hash(&self, key_hash: &str) -> Result<Option<ApiKey>, DomainError>;

    /// List all keys of a project, newest first
    async fn list_by_project(&self, project_id: ProjectId) -> Result<Vec<ApiKey>, DomainError>;
}
