use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Duplicate code: {entity} '{code}' already exists")]
    DuplicateCode { entity: String, code: String },

    #[error("Duplicate assignment: feature '{feature_id}' is already assigned to plan '{plan_id}'")]
    DuplicateAssignment { plan_id: String, feature_id: String },

    #[error("Already assigned: tenant '{tenant_id}' already has a plan in project '{project}'")]
    AlreadyAssigned { tenant_id: String, project: String },

    #[error("Project not found: {project}")]
    ProjectNotFound { project: String },

    #[error("Plan not found: {plan}")]
    PlanNotFound { plan: String },

    #[error("Feature not found: {feature}")]
    FeatureNotFound { feature: String },

    #[error("No plan available for tenant '{tenant_id}' in project '{project_id}'")]
    NoPlanAvailable { tenant_id: String, project_id: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Type mismatch: feature '{feature}' expects a {expected} value, got {actual}")]
    TypeMismatch {
        feature: String,
        expected: String,
        actual: String,
    },

    #[error("Plan '{plan_id}' does not belong to project '{project_id}'")]
    PlanProjectMismatch { plan_id: String, project_id: String },

    #[error("Feature '{feature_id}' does not belong to project '{project_id}'")]
    FeatureProjectMismatch {
        feature_id: String,
        project_id: String,
    },

    #[error("Invalid API key")]
    InvalidKey,

    #[error("Unavailable: {message}")]
    Unavailable { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn duplicate_code(entity: impl Into<String>, code: impl Into<String>) -> Self {
        Self::DuplicateCode {
            entity: entity.into(),
            code: code.into(),
        }
    }

    pub fn duplicate_assignment(plan_id: impl ToString, feature_id: impl ToString) -> Self {
        Self::DuplicateAssignment {
            plan_id: plan_id.to_string(),
            feature_id: feature_id.to_string(),
        }
    }

    pub fn already_assigned(tenant_id: impl ToString, project: impl ToString) -> Self {
        Self::AlreadyAssigned {
            tenant_id: tenant_id.to_string(),
            project: project.to_string(),
        }
    }

    pub fn project_not_found(project: impl ToString) -> Self {
        Self::ProjectNotFound {
            project: project.to_string(),
        }
    }

    pub fn plan_not_found(plan: impl ToString) -> Self {
        Self::PlanNotFound {
            plan: plan.to_string(),
        }
    }

    pub fn feature_not_found(feature: impl ToString) -> Self {
        Self::FeatureNotFound {
            feature: feature.to_string(),
        }
    }

    pub fn no_plan_available(tenant_id: impl ToString, project_id: impl ToString) -> Self {
        Self::NoPlanAvailable {
            tenant_id: tenant_id.to_string(),
            project_id: project_id.to_string(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn type_mismatch(
        feature: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            feature: feature.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn plan_project_mismatch(plan_id: impl ToString, project_id: impl ToString) -> Self {
        Self::PlanProjectMismatch {
            plan_id: plan_id.to_string(),
            project_id: project_id.to_string(),
        }
    }

    pub fn feature_project_mismatch(feature_id: impl ToString, project_id: impl ToString) -> Self {
        Self::FeatureProjectMismatch {
            feature_id: feature_id.to_string(),
            project_id: project_id.to_string(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("name is required");
        assert_eq!(error.to_string(), "Validation error: name is required");
    }

    #[test]
    fn test_duplicate_code_error() {
        let error = DomainError::duplicate_code("plan", "pro");
        assert_eq!(error.to_string(), "Duplicate code: plan 'pro' already exists");
    }

    #[test]
    fn test_type_mismatch_error() {
        let error = DomainError::type_mismatch("sso", "boolean", "string");
        assert_eq!(
            error.to_string(),
            "Type mismatch: feature 'sso' expects a boolean value, got string"
        );
    }
}
