//! Plan service - per-project plan catalog

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{
    normalize_description, validate_code, validate_name, DomainError, IdGenerator, Plan, PlanId,
    PlanLimits, PlanRepository, PlanUpdate, ProjectId, ProjectRepository,
};
use crate::infrastructure::ownership::{require_active_project, require_plan, require_project};

/// Request to create a new plan
#[derive(Debug, Clone, Default)]
pub struct CreatePlanRequest {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub active: Option<bool>,
    pub is_default: bool,
    pub limits: Option<PlanLimits>,
}

/// Request to update a plan. Codes cannot be changed.
#[derive(Debug, Clone, Default)]
pub struct UpdatePlanRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub active: Option<bool>,
    pub is_default: Option<bool>,
    pub limits: Option<PlanLimits>,
}

/// Plan catalog
#[derive(Debug)]
pub struct PlanService {
    projects: Arc<dyn ProjectRepository>,
    plans: Arc<dyn PlanRepository>,
    ids: Arc<dyn IdGenerator>,
}

impl PlanService {
    pub fn new(
        projects: Arc<dyn ProjectRepository>,
        plans: Arc<dyn PlanRepository>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            projects,
            plans,
            ids,
        }
    }

    /// List active plans, default first then newest first
    pub async fn list(&self, project_id: ProjectId) -> Result<Vec<Plan>, DomainError> {
        require_project(self.projects.as_ref(), project_id).await?;
        self.plans.list(project_id, false).await
    }

    /// Create a plan. The first plan of a project always becomes the default.
    pub async fn create(
        &self,
        project_id: ProjectId,
        request: CreatePlanRequest,
    ) -> Result<Plan, DomainError> {
        require_active_project(self.projects.as_ref(), project_id).await?;

        let code = validate_code(&request.code)?;
        let name = validate_name(&request.name)?;

        info!(project_id = %project_id, code = %code, is_default = request.is_default, "Creating plan");

        let plan = Plan::new(PlanId::from_uuid(self.ids.next_id()), project_id, code, name)
            .with_description(normalize_description(request.description))
            .with_active(request.active.unwrap_or(true))
            .with_default(request.is_default)
            .with_limits(request.limits.unwrap_or_default());

        let created = self.plans.create(plan).await?;

        info!(
            project_id = %project_id,
            plan_id = %created.id(),
            is_default = created.is_default(),
            "Plan created"
        );
        Ok(created)
    }

    /// Get a plan of the project
    pub async fn get(&self, project_id: ProjectId, plan_id: PlanId) -> Result<Plan, DomainError> {
        debug!(project_id = %project_id, plan_id = %plan_id, "Getting plan");

        require_project(self.projects.as_ref(), project_id).await?;
        require_plan(self.plans.as_ref(), project_id, plan_id).await
    }

    /// Update a plan. Promoting a plan to default demotes the previous one.
    pub async fn update(
        &self,
        project_id: ProjectId,
        plan_id: PlanId,
        request: UpdatePlanRequest,
    ) -> Result<Plan, DomainError> {
        require_project(self.projects.as_ref(), project_id).await?;

        let changes = PlanUpdate {
            name: request.name.as_deref().map(validate_name).transpose()?,
            description: request
                .description
                .map(|description| normalize_description(Some(description))),
            active: request.active,
            is_default: request.is_default,
            limits: request.limits,
        };

        let updated = self.plans.update(project_id, plan_id, changes).await?;

        info!(
            project_id = %project_id,
            plan_id = %plan_id,
            is_default = updated.is_default(),
            active = updated.is_active(),
            "Plan updated"
        );
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::plan::MockPlanRepository;
    use crate::domain::{Project, UuidGenerator};
    use crate::infrastructure::plan::InMemoryPlanRepository;
    use crate::infrastructure::project::InMemoryProjectRepository;
    use serde_json::json;
    use uuid::Uuid;

    struct Fixture {
        service: PlanService,
        projects: Arc<InMemoryProjectRepository>,
    }

    fn create_fixture() -> Fixture {
        let projects = Arc::new(InMemoryProjectRepository::new());
        let service = PlanService::new(
            projects.clone(),
            Arc::new(InMemoryPlanRepository::new()),
            Arc::new(UuidGenerator),
        );
        Fixture { service, projects }
    }

    async fn add_project(fixture: &Fixture, code: &str) -> ProjectId {
        fixture
            .projects
            .create(Project::new(ProjectId::from_uuid(Uuid::new_v4()), code, code))
            .await
            .unwrap()
            .id()
    }

    fn create_request(code: &str, is_default: bool) -> CreatePlanRequest {
        CreatePlanRequest {
            code: code.to_string(),
            name: code.to_uppercase(),
            is_default,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_first_plan_forced_default_then_demoted() {
        let fixture = create_fixture();
        let project_id = add_project(&fixture, "acme").await;

        let free = fixture
            .service
            .create(project_id, create_request("free", false))
            .await
            .unwrap();
        assert!(free.is_default());

        let pro = fixture
            .service
            .create(project_id, create_request("pro", true))
            .await
            .unwrap();
        assert!(pro.is_default());

        let free = fixture.service.get(project_id, free.id()).await.unwrap();
        assert!(!free.is_default());
    }

    #[tokio::test]
    async fn test_second_plan_without_default_flag_stays_non_default() {
        let fixture = create_fixture();
        let project_id = add_project(&fixture, "acme").await;

        fixture
            .service
            .create(project_id, create_request("free", false))
            .await
            .unwrap();
        let pro = fixture
            .service
            .create(project_id, create_request("pro", false))
            .await
            .unwrap();

        assert!(!pro.is_default());
    }

    #[tokio::test]
    async fn test_duplicate_code_per_project() {
        let fixture = create_fixture();
        let acme = add_project(&fixture, "acme").await;
        let globex = add_project(&fixture, "globex").await;

        fixture
            .service
            .create(acme, create_request("pro", false))
            .await
            .unwrap();

        let err = fixture
            .service
            .create(acme, create_request(" PRO ", false))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::duplicate_code("plan", "pro"));

        assert!(fixture
            .service
            .create(globex, create_request("pro", false))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_create_in_missing_project() {
        let fixture = create_fixture();

        let err = fixture
            .service
            .create(
                ProjectId::from_uuid(Uuid::new_v4()),
                create_request("free", false),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::ProjectNotFound { .. }));
    }

    #[tokio::test]
    async fn test_create_in_inactive_project() {
        let fixture = create_fixture();
        let project_id = fixture
            .projects
            .create(
                Project::new(ProjectId::from_uuid(Uuid::new_v4()), "acme", "Acme")
                    .with_active(false),
            )
            .await
            .unwrap()
            .id();

        let err = fixture
            .service
            .create(project_id, create_request("free", false))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_get_plan_from_other_project() {
        let fixture = create_fixture();
        let acme = add_project(&fixture, "acme").await;
        let globex = add_project(&fixture, "globex").await;
        let plan = fixture
            .service
            .create(acme, create_request("free", false))
            .await
            .unwrap();

        let err = fixture.service.get(globex, plan.id()).await.unwrap_err();
        assert!(matches!(err, DomainError::PlanNotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_promotes_and_keeps_code() {
        let fixture = create_fixture();
        let project_id = add_project(&fixture, "acme").await;
        let free = fixture
            .service
            .create(project_id, create_request("free", false))
            .await
            .unwrap();
        let pro = fixture
            .service
            .create(project_id, create_request("pro", false))
            .await
            .unwrap();

        let updated = fixture
            .service
            .update(
                project_id,
                pro.id(),
                UpdatePlanRequest {
                    is_default: Some(true),
                    limits: Some(json!({"seats": 50}).as_object().cloned().unwrap()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(updated.is_default());
        assert_eq!(updated.code(), "pro");
        assert_eq!(updated.limits().get("seats"), Some(&json!(50)));

        let plans = fixture.service.list(project_id).await.unwrap();
        assert_eq!(plans[0].id(), pro.id());
        assert_eq!(plans.iter().filter(|p| p.is_default()).count(), 1);
        assert!(!fixture.service.get(project_id, free.id()).await.unwrap().is_default());
    }

    #[tokio::test]
    async fn test_update_cannot_deactivate_default() {
        let fixture = create_fixture();
        let project_id = add_project(&fixture, "acme").await;
        let free = fixture
            .service
            .create(project_id, create_request("free", false))
            .await
            .unwrap();

        let err = fixture
            .service
            .update(
                project_id,
                free.id(),
                UpdatePlanRequest {
                    active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_list_hides_inactive_plans() {
        let fixture = create_fixture();
        let project_id = add_project(&fixture, "acme").await;
        fixture
            .service
            .create(project_id, create_request("free", false))
            .await
            .unwrap();
        let mut legacy = create_request("legacy", false);
        legacy.active = Some(false);
        fixture.service.create(project_id, legacy).await.unwrap();

        let plans = fixture.service.list(project_id).await.unwrap();

        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].code(), "free");
    }

    #[tokio::test]
    async fn test_update_storage_failure_propagates() {
        let projects = Arc::new(InMemoryProjectRepository::new());
        let project = projects
            .create(Project::new(ProjectId::from_uuid(Uuid::new_v4()), "acme", "Acme"))
            .await
            .unwrap();
        let existing = Plan::new(PlanId::from_uuid(Uuid::new_v4()), project.id(), "pro", "Pro");

        let mut plans = MockPlanRepository::new();
        plans
            .expect_update()
            .withf(|_, _, changes| changes.promotes() && changes.name.is_none())
            .returning(|_, _, _| Err(DomainError::unavailable("statement timeout")));

        let service = PlanService::new(projects, Arc::new(plans), Arc::new(UuidGenerator));

        let err = service
            .update(
                project.id(),
                existing.id(),
                UpdatePlanRequest {
                    is_default: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Unavailable { .. }));
    }
}
