//! Ownership checks shared by the catalog services
//!
//! Each check loads one entity and verifies it exists and belongs to the
//! expected project, returning the specific not-found or mismatch error.

use crate::domain::{
    DomainError, Feature, FeatureId, FeatureRepository, Plan, PlanId, PlanRepository, Project,
    ProjectId, ProjectRepository,
};

/// The project must exist
pub async fn require_project(
    projects: &dyn ProjectRepository,
    project_id: ProjectId,
) -> Result<Project, DomainError> {
    projects
        .get(project_id)
        .await?
        .ok_or_else(|| DomainError::project_not_found(project_id))
}

/// The project must exist and be active
pub async fn require_active_project(
    projects: &dyn ProjectRepository,
    project_id: ProjectId,
) -> Result<Project, DomainError> {
    let project = require_project(projects, project_id).await?;

    if !project.is_active() {
        return Err(DomainError::validation(format!(
            "project '{}' is inactive",
            project.code()
        )));
    }

    Ok(project)
}

/// The plan must exist within the project; plans of other projects are not found
pub async fn require_plan(
    plans: &dyn PlanRepository,
    project_id: ProjectId,
    plan_id: PlanId,
) -> Result<Plan, DomainError> {
    plans
        .get(project_id, plan_id)
        .await?
        .ok_or_else(|| DomainError::plan_not_found(plan_id))
}

/// The plan must exist; a plan owned by another project is a mismatch
pub async fn require_plan_of_project(
    plans: &dyn PlanRepository,
    project_id: ProjectId,
    plan_id: PlanId,
) -> Result<Plan, DomainError> {
    let plan = plans
        .find(plan_id)
        .await?
        .ok_or_else(|| DomainError::plan_not_found(plan_id))?;

    if plan.project_id() != project_id {
        return Err(DomainError::plan_project_mismatch(plan_id, project_id));
    }

    Ok(plan)
}

/// The feature must exist within the project
pub async fn require_feature(
    features: &dyn FeatureRepository,
    project_id: ProjectId,
    feature_id: FeatureId,
) -> Result<Feature, DomainError> {
    features
        .get(project_id, feature_id)
        .await?
        .ok_or_else(|| DomainError::feature_not_found(feature_id))
}

/// The feature must exist; a feature owned by another project is a mismatch
pub async fn require_feature_of_project(
    features: &dyn FeatureRepository,
    project_id: ProjectId,
    feature_id: FeatureId,
) -> Result<Feature, DomainError> {
    let feature = features
        .find(feature_id)
        .await?
        .ok_or_else(|| DomainError::feature_not_found(feature_id))?;

    if feature.project_id() != project_id {
        return Err(DomainError::feature_project_mismatch(feature_id, project_id));
    }

    Ok(feature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FeatureKind;
    use crate::infrastructure::feature::InMemoryFeatureRepository;
    use crate::infrastructure::plan::InMemoryPlanRepository;
    use crate::infrastructure::project::InMemoryProjectRepository;
    use uuid::Uuid;

    fn project_id() -> ProjectId {
        ProjectId::from_uuid(Uuid::new_v4())
    }

    #[tokio::test]
    async fn test_require_project() {
        let projects = InMemoryProjectRepository::new();
        let project = projects
            .create(Project::new(project_id(), "acme", "Acme"))
            .await
            .unwrap();

        assert!(require_project(&projects, project.id()).await.is_ok());

        let err = require_project(&projects, project_id()).await.unwrap_err();
        assert!(matches!(err, DomainError::ProjectNotFound { .. }));
    }

    #[tokio::test]
    async fn test_require_active_project() {
        let projects = InMemoryProjectRepository::new();
        let project = projects
            .create(Project::new(project_id(), "acme", "Acme").with_active(false))
            .await
            .unwrap();

        let err = require_active_project(&projects, project.id())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_plan_of_other_project() {
        let plans = InMemoryPlanRepository::new();
        let owner = project_id();
        let other = project_id();
        let plan = plans
            .create(Plan::new(PlanId::from_uuid(Uuid::new_v4()), owner, "pro", "Pro"))
            .await
            .unwrap();

        let err = require_plan(&plans, other, plan.id()).await.unwrap_err();
        assert!(matches!(err, DomainError::PlanNotFound { .. }));

        let err = require_plan_of_project(&plans, other, plan.id())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::PlanProjectMismatch { .. }));

        assert!(require_plan_of_project(&plans, owner, plan.id()).await.is_ok());
    }

    #[tokio::test]
    async fn test_feature_of_other_project() {
        let features = InMemoryFeatureRepository::new();
        let owner = project_id();
        let feature = features
            .create(Feature::new(
                FeatureId::from_uuid(Uuid::new_v4()),
                owner,
                "sso",
                FeatureKind::Flag,
                "SSO",
            ))
            .await
            .unwrap();

        let err = require_feature(&features, project_id(), feature.id())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::FeatureNotFound { .. }));

        let err = require_feature_of_project(&features, project_id(), feature.id())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::FeatureProjectMismatch { .. }));

        let err = require_feature_of_project(&features, owner, FeatureId::from_uuid(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::FeatureNotFound { .. }));

        assert!(require_feature_of_project(&features, owner, feature.id()).await.is_ok());
    }
}
