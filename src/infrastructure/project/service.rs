//! Project service - registry of projects and their codes

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{
    normalize_code, normalize_description, validate_code, validate_name, DomainError,
    IdGenerator, Project, ProjectId, ProjectRepository, ProjectUpdate,
};

/// Request to create a new project
#[derive(Debug, Clone)]
pub struct CreateProjectRequest {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub active: Option<bool>,
}

/// Request to update an existing project. Codes cannot be changed.
#[derive(Debug, Clone, Default)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub active: Option<bool>,
}

/// Project registry
#[derive(Debug)]
pub struct ProjectService {
    repository: Arc<dyn ProjectRepository>,
    ids: Arc<dyn IdGenerator>,
}

impl ProjectService {
    pub fn new(repository: Arc<dyn ProjectRepository>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { repository, ids }
    }

    /// Create a new project
    pub async fn create(&self, request: CreateProjectRequest) -> Result<Project, DomainError> {
        let code = validate_code(&request.code)?;
        let name = validate_name(&request.name)?;

        info!(code = %code, "Creating project");

        let project = Project::new(ProjectId::from_uuid(self.ids.next_id()), code, name)
            .with_description(normalize_description(request.description))
            .with_active(request.active.unwrap_or(true));

        let created = self.repository.create(project).await?;

        info!(project_id = %created.id(), code = %created.code(), "Project created");
        Ok(created)
    }

    /// Get a project by ID
    pub async fn get(&self, id: ProjectId) -> Result<Project, DomainError> {
        debug!(project_id = %id, "Getting project");

        self.repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::project_not_found(id))
    }

    /// Get a project by code; the code is normalized before lookup
    pub async fn get_by_code(&self, code: &str) -> Result<Project, DomainError> {
        let code = normalize_code(code);
        debug!(code = %code, "Getting project by code");

        self.repository
            .get_by_code(&code)
            .await?
            .ok_or_else(|| DomainError::project_not_found(code))
    }

    /// Update name, description or active flag
    pub async fn update(
        &self,
        id: ProjectId,
        request: UpdateProjectRequest,
    ) -> Result<Project, DomainError> {
        let changes = ProjectUpdate {
            name: request.name.as_deref().map(validate_name).transpose()?,
            description: request
                .description
                .map(|description| normalize_description(Some(description))),
            active: request.active,
        };

        let updated = self.repository.update(id, changes).await?;

        info!(project_id = %id, active = updated.is_active(), "Project updated");
        Ok(updated)
    }

    /// List active projects, newest first
    pub async fn list(&self) -> Result<Vec<Project>, DomainError> {
        self.repository.list(false).await
    }
}
