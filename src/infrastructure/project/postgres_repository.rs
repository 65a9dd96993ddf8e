//! PostgreSQL project repository implementation

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::{DomainError, Project, ProjectId, ProjectRepository, ProjectUpdate};
use crate::infrastructure::storage::{is_unique_violation, storage_error};

const PROJECT_COLUMNS: &str = "id, code, name, description, active, created_at, updated_at";

/// PostgreSQL implementation of ProjectRepository
#[derive(Debug, Clone)]
pub struct PostgresProjectRepository {
    pool: PgPool,
}

impl PostgresProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn get(&self, id: ProjectId) -> Result<Option<Project>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM projects WHERE id = $1",
            PROJECT_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to get project", e))?;

        Ok(row.as_ref().map(row_to_project))
    }

    async fn get_by_code(&self, code: &str) -> Result<Option<Project>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM projects WHERE code = $1",
            PROJECT_COLUMNS
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to get project by code", e))?;

        Ok(row.as_ref().map(row_to_project))
    }

    async fn create(&self, project: Project) -> Result<Project, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO projects (id, code, name, description, active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(project.id().as_uuid())
        .bind(project.code())
        .bind(project.name())
        .bind(project.description())
        .bind(project.is_active())
        .bind(project.created_at())
        .bind(project.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::duplicate_code("project", project.code())
            } else {
                storage_error("Failed to create project", e)
            }
        })?;

        Ok(project)
    }

    async fn update(&self, id: ProjectId, changes: ProjectUpdate) -> Result<Project, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_error("Failed to begin transaction", e))?;

        let mut project = sqlx::query(&format!(
            "SELECT {} FROM projects WHERE id = $1 FOR UPDATE",
            PROJECT_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| storage_error("Failed to get project", e))?
        .as_ref()
        .map(row_to_project)
        .ok_or_else(|| DomainError::project_not_found(id))?;

        project.apply(&changes);

        sqlx::query(
            r#"
            UPDATE projects
            SET name = $2, description = $3, active = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(project.id().as_uuid())
        .bind(project.name())
        .bind(project.description())
        .bind(project.is_active())
        .bind(project.updated_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| storage_error("Failed to update project", e))?;

        tx.commit()
            .await
            .map_err(|e| storage_error("Failed to commit project", e))?;

        Ok(project)
    }

    async fn list(&self, include_inactive: bool) -> Result<Vec<Project>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM projects WHERE active OR $1 ORDER BY created_at DESC",
            PROJECT_COLUMNS
        ))
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to list projects", e))?;

        Ok(rows.iter().map(row_to_project).collect())
    }
}

fn row_to_project(row: &PgRow) -> Project {
    let id: Uuid = row.get("id");
    let code: String = row.get("code");
    let name: String = row.get("name");

    Project::new(ProjectId::from_uuid(id), code, name)
        .with_description(row.get("description"))
        .with_active(row.get("active"))
        .with_timestamps(row.get("created_at"), row.get("updated_at"))
}
