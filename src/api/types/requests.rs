//! Request and response bodies shared by the admin and project APIs

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{limits_from_value, DomainError};
use crate::infrastructure::feature::{CreateFeatureRequest, UpdateFeatureRequest};
use crate::infrastructure::plan::{CreatePlanRequest, UpdatePlanRequest};
use crate::infrastructure::project::{CreateProjectRequest, UpdateProjectRequest};

/// Collection response
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub total: usize,
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(data: Vec<T>) -> Self {
        let total = data.len();
        Self { data, total }
    }
}

// Required strings default to empty so that missing fields surface as
// validation errors from the services.

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateProjectBody {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub active: Option<bool>,
}

impl From<CreateProjectBody> for CreateProjectRequest {
    fn from(body: CreateProjectBody) -> Self {
        Self {
            code: body.code,
            name: body.name,
            description: body.description,
            active: body.active,
        }
    }
}

/// Any `code` in the payload is ignored
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateProjectBody {
    pub name: Option<String>,
    pub description: Option<String>,
    pub active: Option<bool>,
}

impl From<UpdateProjectBody> for UpdateProjectRequest {
    fn from(body: UpdateProjectBody) -> Self {
        Self {
            name: body.name,
            description: body.description,
            active: body.active,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreatePlanBody {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub active: Option<bool>,
    pub is_default: bool,
    pub limits: Option<Value>,
}

impl TryFrom<CreatePlanBody> for CreatePlanRequest {
    type Error = DomainError;

    fn try_from(body: CreatePlanBody) -> Result<Self, Self::Error> {
        Ok(Self {
            code: body.code,
            name: body.name,
            description: body.description,
            active: body.active,
            is_default: body.is_default,
            limits: body.limits.map(limits_from_value).transpose()?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdatePlanBody {
    pub name: Option<String>,
    pub description: Option<String>,
    pub active: Option<bool>,
    pub is_default: Option<bool>,
    pub limits: Option<Value>,
}

impl TryFrom<UpdatePlanBody> for UpdatePlanRequest {
    type Error = DomainError;

    fn try_from(body: UpdatePlanBody) -> Result<Self, Self::Error> {
        Ok(Self {
            name: body.name,
            description: body.description,
            active: body.active,
            is_default: body.is_default,
            limits: body.limits.map(limits_from_value).transpose()?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateFeatureBody {
    pub code: String,
    pub kind: String,
    pub name: String,
    pub description: Option<String>,
    pub active: Option<bool>,
}

impl From<CreateFeatureBody> for CreateFeatureRequest {
    fn from(body: CreateFeatureBody) -> Self {
        Self {
            code: body.code,
            kind: body.kind,
            name: body.name,
            description: body.description,
            active: body.active,
        }
    }
}

/// Any `code` or `kind` in the payload is ignored
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateFeatureBody {
    pub name: Option<String>,
    pub description: Option<String>,
    pub active: Option<bool>,
}

impl From<UpdateFeatureBody> for UpdateFeatureRequest {
    fn from(body: UpdateFeatureBody) -> Self {
        Self {
            name: body.name,
            description: body.description,
            active: body.active,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AssignFeatureBody {
    pub feature_id: String,
    pub value: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AssignTenantPlanBody {
    pub project_code: String,
    pub plan_code: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReassignTenantPlanBody {
    pub plan_code: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpsertTenantPlanBody {
    pub plan_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RevokeKeysBody {
    pub key_prefix: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RevokeKeysResponse {
    pub revoked: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_project_ignores_code() {
        let body: UpdateProjectBody =
            serde_json::from_value(json!({ "code": "renamed", "name": "Acme Corp" })).unwrap();
        let request = UpdateProjectRequest::from(body);

        assert_eq!(request.name.as_deref(), Some("Acme Corp"));
        assert!(request.description.is_none());
    }

    #[test]
    fn test_create_plan_limits_must_be_object() {
        let body: CreatePlanBody = serde_json::from_value(json!({
            "code": "pro",
            "name": "Pro",
            "limits": [1, 2, 3]
        }))
        .unwrap();

        let err = CreatePlanRequest::try_from(body).unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[test]
    fn test_create_plan_defaults() {
        let body: CreatePlanBody =
            serde_json::from_value(json!({ "code": "free", "name": "Free", "limits": { "seats": 3 } }))
                .unwrap();
        let request = CreatePlanRequest::try_from(body).unwrap();

        assert!(!request.is_default);
        assert!(request.active.is_none());
        assert_eq!(request.limits.unwrap()["seats"], json!(3));
    }

    #[test]
    fn test_missing_required_fields_deserialize_empty() {
        let body: CreateFeatureBody = serde_json::from_value(json!({ "kind": "flag" })).unwrap();
        assert!(body.code.is_empty());
        assert!(body.name.is_empty());
    }

    #[test]
    fn test_list_response_total() {
        let list = ListResponse::from(vec![1, 2, 3]);
        assert_eq!(list.total, 3);
    }
}
