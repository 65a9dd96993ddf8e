//! API key service
//!
//! Issues, rotates, revokes and validates project API keys.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::{
    ApiKey, ApiKeyId, ApiKeyRepository, DomainError, IdGenerator, ProjectId, ProjectRepository,
};
use crate::infrastructure::ownership::require_project;

use super::generator::ApiKeyGenerator;

/// A freshly issued key: the raw secret is only ever returned here
#[derive(Debug, Clone, Serialize)]
pub struct IssuedApiKey {
    #[serde(flatten)]
    pub api_key: ApiKey,
    /// The raw key
    pub key: String,
}

/// API key authority
#[derive(Debug)]
pub struct ApiKeyService {
    projects: Arc<dyn ProjectRepository>,
    keys: Arc<dyn ApiKeyRepository>,
    ids: Arc<dyn IdGenerator>,
    generator: ApiKeyGenerator,
}

impl ApiKeyService {
    pub fn new(
        projects: Arc<dyn ProjectRepository>,
        keys: Arc<dyn ApiKeyRepository>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            projects,
            keys,
            ids,
            generator: ApiKeyGenerator::default(),
        }
    }

    /// Issue a key for the project, revoking every active one
    pub async fn create_key(&self, project_id: ProjectId) -> Result<IssuedApiKey, DomainError> {
        require_project(self.projects.as_ref(), project_id).await?;
        self.issue(project_id).await
    }

    /// Replace the project's active key with a new one
    pub async fn rotate_key(&self, project_id: ProjectId) -> Result<IssuedApiKey, DomainError> {
        require_project(self.projects.as_ref(), project_id).await?;

        info!(project_id = %project_id, "Rotating API key");
        self.issue(project_id).await
    }

    /// Revoke all active keys, or only those matching `key_prefix`
    pub async fn revoke_key(
        &self,
        project_id: ProjectId,
        key_prefix: Option<&str>,
    ) -> Result<u64, DomainError> {
        require_project(self.projects.as_ref(), project_id).await?;

        let prefix = key_prefix.map(str::trim).filter(|p| !p.is_empty());
        let revoked = match prefix {
            Some(prefix) => {
                let revoked = self.keys.revoke_by_prefix(project_id, prefix).await?;
                if revoked == 0 {
                    return Err(DomainError::not_found(format!(
                        "No active API key with prefix '{}'",
                        prefix
                    )));
                }
                revoked
            }
            None => self.keys.revoke_all(project_id).await?,
        };

        info!(project_id = %project_id, revoked, "API keys revoked");
        Ok(revoked)
    }

    /// Resolve a raw key to the owning project
    pub async fn validate(&self, raw_key: &str) -> Result<ProjectId, DomainError> {
        let prefix = self.generator.extract_prefix(raw_key);

        if !self.generator.looks_like_key(raw_key) {
            warn!(key_prefix = %prefix, "Rejected malformed API key");
            return Err(DomainError::InvalidKey);
        }

        let hash = ApiKeyGenerator::hash_key(raw_key);
        let Some(api_key) = self.keys.get_active_by_hash(&hash).await? else {
            warn!(key_prefix = %prefix, "Rejected unknown or revoked API key");
            return Err(DomainError::InvalidKey);
        };

        match self.projects.get(api_key.project_id()).await? {
            Some(project) if project.is_active() => {
                debug!(project_id = %project.id(), key_prefix = %prefix, "API key validated");
                Ok(project.id())
            }
            _ => {
                warn!(
                    project_id = %api_key.project_id(),
                    key_prefix = %prefix,
                    "Rejected API key of inactive project"
                );
                Err(DomainError::InvalidKey)
            }
        }
    }

    /// Key metadata of a project, newest first
    pub async fn list_keys(&self, project_id: ProjectId) -> Result<Vec<ApiKey>, DomainError> {
        require_project(self.projects.as_ref(), project_id).await?;
        self.keys.list_by_project(project_id).await
    }

    async fn issue(&self, project_id: ProjectId) -> Result<IssuedApiKey, DomainError> {
        let generated = self.generator.generate();

        let api_key = ApiKey::new(
            ApiKeyId::from_uuid(self.ids.next_id()),
            project_id,
            generated.hash,
            generated.prefix,
        );

        let stored = self.keys.replace_active(api_key).await?;

        info!(
            project_id = %project_id,
            key_prefix = %stored.key_prefix(),
            "API key issued"
        );

        Ok(IssuedApiKey {
            api_key: stored,
            key: generated.key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::api_key::MockApiKeyRepository;
    use crate::domain::{Project, ProjectUpdate, UuidGenerator};
    use crate::infrastructure::api_key::InMemoryApiKeyRepository;
    use crate::infrastructure::project::InMemoryProjectRepository;
    use uuid::Uuid;

    async fn create_service() -> (ApiKeyService, Arc<InMemoryProjectRepository>, ProjectId) {
        let projects = Arc::new(InMemoryProjectRepository::new());
        let project = projects
            .create(Project::new(ProjectId::from_uuid(Uuid::new_v4()), "acme", "Acme"))
            .await
            .unwrap();

        let service = ApiKeyService::new(
            projects.clone(),
            Arc::new(InMemoryApiKeyRepository::new()),
            Arc::new(UuidGenerator),
        );
        (service, projects, project.id())
    }

    #[tokio::test]
    async fn test_create_then_validate() {
        let (service, _, project_id) = create_service().await;

        let issued = service.create_key(project_id).await.unwrap();

        let body = issued.key.strip_prefix(ApiKeyGenerator::DEFAULT_MARKER).unwrap();
        assert!(body.starts_with(issued.api_key.key_prefix()));
        assert!(!issued.api_key.key_prefix().starts_with("pfk_"));
        assert_eq!(service.validate(&issued.key).await.unwrap(), project_id);
    }

    #[tokio::test]
    async fn test_rotation_invalidates_previous_key() {
        let (service, _, project_id) = create_service().await;

        let k1 = service.create_key(project_id).await.unwrap();
        assert_eq!(service.validate(&k1.key).await.unwrap(), project_id);

        let k2 = service.rotate_key(project_id).await.unwrap();

        assert_eq!(
            service.validate(&k1.key).await.unwrap_err(),
            DomainError::InvalidKey
        );
        assert_eq!(service.validate(&k2.key).await.unwrap(), project_id);

        let keys = service.list_keys(project_id).await.unwrap();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys.iter().filter(|k| k.is_active()).count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_rotations_leave_one_active_key() {
        let (service, _, project_id) = create_service().await;
        let service = Arc::new(service);

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move {
                    if i % 2 == 0 {
                        service.rotate_key(project_id).await
                    } else {
                        service.create_key(project_id).await
                    }
                })
            })
            .collect();

        let mut issued = Vec::new();
        for handle in handles {
            issued.push(handle.await.unwrap().unwrap());
        }

        let keys = service.list_keys(project_id).await.unwrap();
        assert_eq!(keys.len(), 16);
        assert_eq!(keys.iter().filter(|k| !k.is_revoked()).count(), 1);

        let mut valid = 0;
        for key in &issued {
            if service.validate(&key.key).await.is_ok() {
                valid += 1;
            }
        }
        assert_eq!(valid, 1);
    }

    #[tokio::test]
    async fn test_validate_rejects_malformed_keys() {
        let (service, _, _) = create_service().await;

        for raw in ["", "pfk_", "not-a-key", "Bearer pfk_abc"] {
            assert_eq!(service.validate(raw).await.unwrap_err(), DomainError::InvalidKey);
        }

        let unknown = ApiKeyGenerator::default().generate();
        assert_eq!(
            service.validate(&unknown.key).await.unwrap_err(),
            DomainError::InvalidKey
        );
    }

    #[tokio::test]
    async fn test_revoke_by_prefix() {
        let (service, _, project_id) = create_service().await;
        let issued = service.create_key(project_id).await.unwrap();

        let err = service
            .revoke_key(project_id, Some("nomatch0"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
        assert!(service.validate(&issued.key).await.is_ok());

        let revoked = service
            .revoke_key(project_id, Some(issued.api_key.key_prefix()))
            .await
            .unwrap();
        assert_eq!(revoked, 1);
        assert_eq!(
            service.validate(&issued.key).await.unwrap_err(),
            DomainError::InvalidKey
        );
    }

    #[tokio::test]
    async fn test_revoke_all_without_keys() {
        let (service, _, project_id) = create_service().await;
        assert_eq!(service.revoke_key(project_id, None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_inactive_project_key_is_invalid() {
        let (service, projects, project_id) = create_service().await;
        let issued = service.create_key(project_id).await.unwrap();

        projects
            .update(
                project_id,
                ProjectUpdate {
                    active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(
            service.validate(&issued.key).await.unwrap_err(),
            DomainError::InvalidKey
        );
    }

    #[tokio::test]
    async fn test_missing_project() {
        let (service, _, _) = create_service().await;

        let err = service
            .create_key(ProjectId::from_uuid(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ProjectNotFound { .. }));
    }

    #[tokio::test]
    async fn test_issued_key_serializes_secret_once() {
        let (service, _, project_id) = create_service().await;
        let issued = service.create_key(project_id).await.unwrap();

        let json = serde_json::to_value(&issued).unwrap();
        assert_eq!(json["key"], issued.key.as_str());
        assert!(json.get("key_hash").is_none());

        let listed = serde_json::to_value(service.list_keys(project_id).await.unwrap()).unwrap();
        assert!(!listed.to_string().contains(&issued.key));
    }

    #[tokio::test]
    async fn test_storage_failure_is_unavailable() {
        let projects = Arc::new(InMemoryProjectRepository::new());
        let project = projects
            .create(Project::new(ProjectId::from_uuid(Uuid::new_v4()), "acme", "Acme"))
            .await
            .unwrap();

        let mut keys = MockApiKeyRepository::new();
        keys.expect_replace_active()
            .returning(|_| Err(DomainError::unavailable("pool timed out")));
        let service = ApiKeyService::new(projects, Arc::new(keys), Arc::new(UuidGenerator));

        let err = service.create_key(project.id()).await.unwrap_err();
        assert!(matches!(err, DomainError::Unavailable { .. }));
    }
}
