//! Domain layer - Core business logic and entities

pub mod api_key;
pub mod error;
pub mod feature;
pub mod id;
pub mod plan;
pub mod plan_feature;
pub mod project;
pub mod tenant_plan;
pub mod validation;

pub use api_key::{ApiKey, ApiKeyRepository, KEY_PREFIX_LENGTH};
pub use error::DomainError;
pub use feature::{Feature, FeatureKind, FeatureRepository, FeatureUpdate};
pub use id::{
    ApiKeyId, FeatureId, IdGenerator, PlanFeatureId, PlanId, ProjectId, TenantId, TenantPlanId,
    UuidGenerator,
};
pub use plan::{limits_from_value, Plan, PlanLimits, PlanRepository, PlanUpdate};
pub use plan_feature::{PlanFeature, PlanFeatureRepository};
pub use project::{Project, ProjectRepository, ProjectUpdate};
pub use tenant_plan::{
    AssignmentSource, EffectivePlan, Entitlements, TenantPlan, TenantPlanRepository,
};
pub use validation::{normalize_code, normalize_description, validate_code, validate_name};
