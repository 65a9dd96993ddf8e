//! Feature service - per-project feature catalog

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{
    normalize_description, validate_code, validate_name, DomainError, Feature, FeatureId,
    FeatureKind, FeatureRepository, FeatureUpdate, IdGenerator, ProjectId, ProjectRepository,
};
use crate::infrastructure::ownership::{require_active_project, require_feature, require_project};

/// Request to create a new feature
#[derive(Debug, Clone, Default)]
pub struct CreateFeatureRequest {
    pub code: String,
    /// One of `flag`, `numeric` or `value`
    pub kind: String,
    pub name: String,
    pub description: Option<String>,
    pub active: Option<bool>,
}

/// Request to update a feature. Code and kind cannot be changed.
#[derive(Debug, Clone, Default)]
pub struct UpdateFeatureRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub active: Option<bool>,
}

/// Feature catalog
#[derive(Debug)]
pub struct FeatureService {
    projects: Arc<dyn ProjectRepository>,
    features: Arc<dyn FeatureRepository>,
    ids: Arc<dyn IdGenerator>,
}

impl FeatureService {
    pub fn new(
        projects: Arc<dyn ProjectRepository>,
        features: Arc<dyn FeatureRepository>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            projects,
            features,
            ids,
        }
    }

    /// List active features, newest first
    pub async fn list(&self, project_id: ProjectId) -> Result<Vec<Feature>, DomainError> {
        require_project(self.projects.as_ref(), project_id).await?;
        self.features.list(project_id, false).await
    }

    /// Create a feature
    pub async fn create(
        &self,
        project_id: ProjectId,
        request: CreateFeatureRequest,
    ) -> Result<Feature, DomainError> {
        require_active_project(self.projects.as_ref(), project_id).await?;

        let code = validate_code(&request.code)?;
        let name = validate_name(&request.name)?;
        let kind: FeatureKind = request.kind.parse()?;

        info!(project_id = %project_id, code = %code, kind = %kind, "Creating feature");

        let feature = Feature::new(
            FeatureId::from_uuid(self.ids.next_id()),
            project_id,
            code,
            kind,
            name,
        )
        .with_description(normalize_description(request.description))
        .with_active(request.active.unwrap_or(true));

        let created = self.features.create(feature).await?;

        info!(project_id = %project_id, feature_id = %created.id(), "Feature created");
        Ok(created)
    }

    /// Get a feature of the project
    pub async fn get(
        &self,
        project_id: ProjectId,
        feature_id: FeatureId,
    ) -> Result<Feature, DomainError> {
        debug!(project_id = %project_id, feature_id = %feature_id, "Getting feature");

        require_project(self.projects.as_ref(), project_id).await?;
        require_feature(self.features.as_ref(), project_id, feature_id).await
    }

    /// Update name, description or active flag
    pub async fn update(
        &self,
        project_id: ProjectId,
        feature_id: FeatureId,
        request: UpdateFeatureRequest,
    ) -> Result<Feature, DomainError> {
        require_project(self.projects.as_ref(), project_id).await?;
        let changes = FeatureUpdate {
            name: request.name.as_deref().map(validate_name).transpose()?,
            description: request
                .description
                .map(|description| normalize_description(Some(description))),
            active: request.active,
        };

        let updated = self.features.update(project_id, feature_id, changes).await?;

        info!(project_id = %project_id, feature_id = %feature_id, "Feature updated");
        Ok(updated)
    }
}
