//! In-memory feature repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{DomainError, Feature, FeatureId, FeatureRepository, FeatureUpdate, ProjectId};

/// In-memory implementation of FeatureRepository
#[derive(Debug, Default)]
pub struct InMemoryFeatureRepository {
    features: Arc<RwLock<HashMap<FeatureId, Feature>>>,
}

impl InMemoryFeatureRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FeatureRepository for InMemoryFeatureRepository {
    async fn get(&self, project_id: ProjectId, feature_id: FeatureId) -> Result<Option<Feature>, DomainError> {
        let features = self.features.read().await;
        Ok(features
            .get(&feature_id)
            .filter(|f| f.project_id() == project_id)
            .cloned())
    }

    async fn find(&self, feature_id: FeatureId) -> Result<Option<Feature>, DomainError> {
        let features = self.features.read().await;
        Ok(features.get(&feature_id).cloned())
    }

    async fn get_by_code(&self, project_id: ProjectId, code: &str) -> Result<Option<Feature>, DomainError> {
        let features = self.features.read().await;
        Ok(features
            .values()
            .find(|f| f.project_id() == project_id && f.code() == code)
            .cloned())
    }

    async fn list(&self, project_id: ProjectId, include_inactive: bool) -> Result<Vec<Feature>, DomainError> {
        let features = self.features.read().await;

        let mut result: Vec<Feature> = features
            .values()
            .filter(|f| f.project_id() == project_id && (include_inactive || f.is_active()))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        Ok(result)
    }

    async fn create(&self, feature: Feature) -> Result<Feature, DomainError> {
        let mut features = self.features.write().await;

        if features
            .values()
            .any(|f| f.project_id() == feature.project_id() && f.code() == feature.code())
        {
            return Err(DomainError::duplicate_code("feature", feature.code()));
        }

        features.insert(feature.id(), feature.clone());
        Ok(feature)
    }

    async fn update(
        &self,
        project_id: ProjectId,
        feature_id: FeatureId,
        changes: FeatureUpdate,
    ) -> Result<Feature, DomainError> {
        let mut features = self.features.write().await;

        let feature = features
            .get_mut(&feature_id)
            .filter(|f| f.project_id() == project_id)
            .ok_or_else(|| DomainError::feature_not_found(feature_id))?;
        feature.apply(&changes);

        Ok(feature.clone())
    }
}
