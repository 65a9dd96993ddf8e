//! In-memory project repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{DomainError, Project, ProjectId, ProjectRepository, ProjectUpdate};

/// In-memory implementation of ProjectRepository
#[derive(Debug, Default)]
pub struct InMemoryProjectRepository {
    projects: Arc<RwLock<HashMap<ProjectId, Project>>>,
}

impl InMemoryProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn get(&self, id: ProjectId) -> Result<Option<Project>, DomainError> {
        let projects = self.projects.read().await;
        Ok(projects.get(&id).cloned())
    }

    async fn get_by_code(&self, code: &str) -> Result<Option<Project>, DomainError> {
        let projects = self.projects.read().await;
        Ok(projects.values().find(|p| p.code() == code).cloned())
    }

    async fn create(&self, project: Project) -> Result<Project, DomainError> {
        let mut projects = self.projects.write().await;

        if projects.values().any(|p| p.code() == project.code()) {
            return Err(DomainError::duplicate_code("project", project.code()));
        }

        projects.insert(project.id(), project.clone());
        Ok(project)
    }

    async fn update(&self, id: ProjectId, changes: ProjectUpdate) -> Result<Project, DomainError> {
        let mut projects = self.projects.write().await;

        let project = projects
            .get_mut(&id)
            .ok_or_else(|| DomainError::project_not_found(id))?;
        project.apply(&changes);

        Ok(project.clone())
    }

    async fn list(&self, include_inactive: bool) -> Result<Vec<Project>, DomainError> {
        let projects = self.projects.read().await;

        let mut result: Vec<Project> = projects
            .values()
            .filter(|p| include_inactive || p.is_active())
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn project(code: &str) -> Project {
        Project::new(ProjectId::from_uuid(Uuid::new_v4()), code, code.to_uppercase())
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryProjectRepository::new();
        let created = repo.create(project("acme")).await.unwrap();

        let fetched = repo.get(created.id()).await.unwrap();
        assert_eq!(fetched, Some(created.clone()));

        let by_code = repo.get_by_code("acme").await.unwrap();
        assert_eq!(by_code.map(|p| p.id()), Some(created.id()));
    }

    #[tokio::test]
    async fn test_duplicate_code_rejected() {
        let repo = InMemoryProjectRepository::new();
        repo.create(project("acme")).await.unwrap();

        let err = repo.create(project("acme")).await.unwrap_err();
        assert_eq!(err, DomainError::duplicate_code("project", "acme"));
    }

    #[tokio::test]
    async fn test_update_missing_project() {
        let repo = InMemoryProjectRepository::new();

        let err = repo
            .update(project("ghost").id(), ProjectUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ProjectNotFound { .. }));
    }

    #[tokio::test]
    async fn test_concurrent_updates_of_different_fields() {
        let repo = Arc::new(InMemoryProjectRepository::new());
        let created = repo.create(project("acme")).await.unwrap();

        let rename = {
            let repo = repo.clone();
            let created = created.clone();
            tokio::spawn(async move {
                repo.update(
                    created.id(),
                    ProjectUpdate {
                        name: Some("Acme Corp".into()),
                        ..Default::default()
                    },
                )
                .await
            })
        };
        let deactivate = {
            let repo = repo.clone();
            let created = created.clone();
            tokio::spawn(async move {
                repo.update(
                    created.id(),
                    ProjectUpdate {
                        active: Some(false),
                        ..Default::default()
                    },
                )
                .await
            })
        };

        rename.await.unwrap().unwrap();
        deactivate.await.unwrap().unwrap();

        let stored = repo.get(created.id()).await.unwrap().unwrap();
        assert_eq!(stored.name(), "Acme Corp");
        assert!(!stored.is_active());
    }

    #[tokio::test]
    async fn test_list_filters_inactive() {
        let repo = InMemoryProjectRepository::new();
        repo.create(project("acme")).await.unwrap();
        repo.create(project("globex").with_active(false)).await.unwrap();

        assert_eq!(repo.list(false).await.unwrap().len(), 1);
        assert_eq!(repo.list(true).await.unwrap().len(), 2);
    }
}
