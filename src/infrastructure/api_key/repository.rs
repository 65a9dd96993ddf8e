//! In-memory API key repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{ApiKey, ApiKeyId, ApiKeyRepository, DomainError, ProjectId};

/// In-memory implementation of ApiKeyRepository
#[derive(Debug, Default)]
pub struct InMemoryApiKeyRepository {
    keys: Arc<RwLock<HashMap<ApiKeyId, ApiKey>>>,
}

impl InMemoryApiKeyRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn revoke_matching(
    keys: &mut HashMap<ApiKeyId, ApiKey>,
    project_id: ProjectId,
    key_prefix: Option<&str>,
) -> u64 {
    let mut revoked = 0;

    for key in keys.values_mut() {
        if key.project_id() != project_id || key.is_revoked() {
            continue;
        }
        if key_prefix.is_some_and(|prefix| key.key_prefix() != prefix) {
            continue;
        }

        key.revoke();
        revoked += 1;
    }

    revoked
}

#[async_trait]
impl ApiKeyRepository for InMemoryApiKeyRepository {
    async fn replace_active(&self, api_key: ApiKey) -> Result<ApiKey, DomainError> {
        let mut keys = self.keys.write().await;

        if keys
            .values()
            .any(|k| k.id() == api_key.id() || k.key_hash() == api_key.key_hash())
        {
            return Err(DomainError::internal(format!(
                "API key '{}' collides with a stored key",
                api_key.id()
            )));
        }

        revoke_matching(&mut keys, api_key.project_id(), None);
        keys.insert(api_key.id(), api_key.clone());

        Ok(api_key)
    }

    async fn revoke_all(&self, project_id: ProjectId) -> Result<u64, DomainError> {
        let mut keys = self.keys.write().await;
        Ok(revoke_matching(&mut keys, project_id, None))
    }

    async fn revoke_by_prefix(
        &self,
        project_id: ProjectId,
        key_prefix: &str,
    ) -> Result<u64, DomainError> {
        let mut keys = self.keys.write().await;
        Ok(revoke_matching(&mut keys, project_id, Some(key_prefix)))
    }

    async fn get_active_by_hash(&self, key_hash: &str) -> Result<Option<ApiKey>, DomainError> {
        let keys = self.keys.read().await;
        Ok(keys
            .values()
            .find(|k| k.is_active() && k.key_hash() == key_hash)
            .cloned())
    }

    async fn list_by_project(&self, project_id: ProjectId) -> Result<Vec<ApiKey>, DomainError> {
        let keys = self.keys.read().await;

        let mut result: Vec<ApiKey> = keys
            .values()
            .filter(|k| k.project_id() == project_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        Ok(result)
    }
}
