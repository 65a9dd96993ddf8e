//! Plan-feature service - binds typed feature values to plans

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::domain::{
    DomainError, FeatureId, FeatureRepository, IdGenerator, PlanFeature, PlanFeatureId,
    PlanFeatureRepository, PlanId, PlanRepository, ProjectId, ProjectRepository,
};
use crate::infrastructure::ownership::{
    require_feature_of_project, require_plan, require_project,
};

/// Plan-feature assignment
#[derive(Debug)]
pub struct PlanFeatureService {
    projects: Arc<dyn ProjectRepository>,
    plans: Arc<dyn PlanRepository>,
    features: Arc<dyn FeatureRepository>,
    plan_features: Arc<dyn PlanFeatureRepository>,
    ids: Arc<dyn IdGenerator>,
}

impl PlanFeatureService {
    pub fn new(
        projects: Arc<dyn ProjectRepository>,
        plans: Arc<dyn PlanRepository>,
        features: Arc<dyn FeatureRepository>,
        plan_features: Arc<dyn PlanFeatureRepository>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            projects,
            plans,
            features,
            plan_features,
            ids,
        }
    }

    /// Assign a feature value to a plan
    ///
    /// The value's JSON type must match the feature kind; each (plan, feature)
    /// pair can be assigned once.
    pub async fn assign(
        &self,
        project_id: ProjectId,
        plan_id: PlanId,
        feature_id: FeatureId,
        value: Value,
    ) -> Result<PlanFeature, DomainError> {
        require_project(self.projects.as_ref(), project_id).await?;
        let plan = require_plan(self.plans.as_ref(), project_id, plan_id).await?;
        let feature =
            require_feature_of_project(self.features.as_ref(), plan.project_id(), feature_id).await?;

        feature.check_value(&value)?;

        info!(
            project_id = %project_id,
            plan = %plan.code(),
            feature = %feature.code(),
            "Assigning feature to plan"
        );

        let plan_feature = PlanFeature::new(
            PlanFeatureId::from_uuid(self.ids.next_id()),
            project_id,
            plan_id,
            feature_id,
            value,
        );

        self.plan_features.create(plan_feature).await
    }

    /// List feature values of a plan
    pub async fn list_by_plan(
        &self,
        project_id: ProjectId,
        plan_id: PlanId,
    ) -> Result<Vec<PlanFeature>, DomainError> {
        debug!(project_id = %project_id, plan_id = %plan_id, "Listing plan features");

        require_project(self.projects.as_ref(), project_id).await?;
        require_plan(self.plans.as_ref(), project_id, plan_id).await?;

        self.plan_features.list_by_plan(project_id, plan_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::plan_feature::MockPlanFeatureRepository;
    use crate::domain::{Feature, FeatureKind, Plan, Project, UuidGenerator};
    use crate::infrastructure::feature::InMemoryFeatureRepository;
    use crate::infrastructure::plan::InMemoryPlanRepository;
    use crate::infrastructure::plan_feature::InMemoryPlanFeatureRepository;
    use crate::infrastructure::project::InMemoryProjectRepository;
    use serde_json::json;
    use uuid::Uuid;

    struct Fixture {
        projects: Arc<InMemoryProjectRepository>,
        plans: Arc<InMemoryPlanRepository>,
        features: Arc<InMemoryFeatureRepository>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                projects: Arc::new(InMemoryProjectRepository::new()),
                plans: Arc::new(InMemoryPlanRepository::new()),
                features: Arc::new(InMemoryFeatureRepository::new()),
            }
        }

        fn service(&self, plan_features: Arc<dyn PlanFeatureRepository>) -> PlanFeatureService {
            PlanFeatureService::new(
                self.projects.clone(),
                self.plans.clone(),
                self.features.clone(),
                plan_features,
                Arc::new(UuidGenerator),
            )
        }

        async fn project(&self, code: &str) -> ProjectId {
            self.projects
                .create(Project::new(ProjectId::from_uuid(Uuid::new_v4()), code, code))
                .await
                .unwrap()
                .id()
        }

        async fn plan(&self, project_id: ProjectId, code: &str) -> PlanId {
            self.plans
                .create(Plan::new(PlanId::from_uuid(Uuid::new_v4()), project_id, code, code))
                .await
                .unwrap()
                .id()
        }

        async fn feature(&self, project_id: ProjectId, code: &str, kind: FeatureKind) -> FeatureId {
            self.features
                .create(Feature::new(
                    FeatureId::from_uuid(Uuid::new_v4()),
                    project_id,
                    code,
                    kind,
                    code,
                ))
                .await
                .unwrap()
                .id()
        }
    }

    #[tokio::test]
    async fn test_assign_numeric_then_duplicate() {
        let fixture = Fixture::new();
        let service = fixture.service(Arc::new(InMemoryPlanFeatureRepository::new()));
        let project_id = fixture.project("acme").await;
        let pro = fixture.plan(project_id, "pro").await;
        let max_seats = fixture
            .feature(project_id, "max_seats", FeatureKind::Numeric)
            .await;

        let assigned = service
            .assign(project_id, pro, max_seats, json!(25))
            .await
            .unwrap();
        assert_eq!(assigned.value(), &json!(25));

        let err = service
            .assign(project_id, pro, max_seats, json!(50))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateAssignment { .. }));

        let listed = service.list_by_plan(project_id, pro).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].value(), &json!(25));
    }

    #[tokio::test]
    async fn test_assign_flag_type_checks() {
        let fixture = Fixture::new();
        let service = fixture.service(Arc::new(InMemoryPlanFeatureRepository::new()));
        let project_id = fixture.project("acme").await;
        let pro = fixture.plan(project_id, "pro").await;
        let sso = fixture.feature(project_id, "sso", FeatureKind::Flag).await;

        let err = service
            .assign(project_id, pro, sso, json!("true"))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::type_mismatch("sso", "boolean", "string"));

        assert!(service.assign(project_id, pro, sso, json!(true)).await.is_ok());
    }

    #[tokio::test]
    async fn test_assign_value_kind_requires_string() {
        let fixture = Fixture::new();
        let service = fixture.service(Arc::new(InMemoryPlanFeatureRepository::new()));
        let project_id = fixture.project("acme").await;
        let pro = fixture.plan(project_id, "pro").await;
        let region = fixture.feature(project_id, "region", FeatureKind::Value).await;

        let err = service
            .assign(project_id, pro, region, json!(42))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::TypeMismatch { .. }));

        assert!(service
            .assign(project_id, pro, region, json!("eu-west"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_assign_cross_project_references() {
        let fixture = Fixture::new();
        let service = fixture.service(Arc::new(InMemoryPlanFeatureRepository::new()));
        let acme = fixture.project("acme").await;
        let globex = fixture.project("globex").await;
        let acme_plan = fixture.plan(acme, "pro").await;
        let globex_plan = fixture.plan(globex, "pro").await;
        let globex_feature = fixture.feature(globex, "sso", FeatureKind::Flag).await;

        let err = service
            .assign(acme, acme_plan, globex_feature, json!(true))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::FeatureProjectMismatch { .. }));

        let err = service
            .assign(acme, acme_plan, FeatureId::from_uuid(Uuid::new_v4()), json!(true))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::FeatureNotFound { .. }));

        let err = service
            .assign(acme, globex_plan, globex_feature, json!(true))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::PlanNotFound { .. }));

        let err = service
            .assign(
                ProjectId::from_uuid(Uuid::new_v4()),
                acme_plan,
                globex_feature,
                json!(true),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ProjectNotFound { .. }));
    }

    #[tokio::test]
    async fn test_type_mismatch_never_reaches_storage() {
        let fixture = Fixture::new();
        let mut plan_features = MockPlanFeatureRepository::new();
        plan_features.expect_create().never();
        let service = fixture.service(Arc::new(plan_features));

        let project_id = fixture.project("acme").await;
        let pro = fixture.plan(project_id, "pro").await;
        let seats = fixture.feature(project_id, "seats", FeatureKind::Numeric).await;

        let err = service
            .assign(project_id, pro, seats, json!("25"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::TypeMismatch { .. }));
    }

    #[tokio::test]
    async fn test_list_by_plan_of_other_project() {
        let fixture = Fixture::new();
        let service = fixture.service(Arc::new(InMemoryPlanFeatureRepository::new()));
        let acme = fixture.project("acme").await;
        let globex = fixture.project("globex").await;
        let globex_plan = fixture.plan(globex, "pro").await;

        let err = service.list_by_plan(acme, globex_plan).await.unwrap_err();
        assert!(matches!(err, DomainError::PlanNotFound { .. }));
    }
}
