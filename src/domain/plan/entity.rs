//! Plan entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::id::{PlanId, ProjectId};
use crate::domain::DomainError;

/// Open key/value map of plan limits
pub type PlanLimits = Map<String, Value>;

/// Plan entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    id: PlanId,
    project_id: ProjectId,
    /// Normalized code, unique within the project and immutable
    code: String,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    active: bool,
    is_default: bool,
    #[serde(default)]
    limits: PlanLimits,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Plan {
    /// Create a new active, non-default plan. `code` must already be normalized.
    pub fn new(
        id: PlanId,
        project_id: ProjectId,
        code: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            project_id,
            code: code.into(),
            name: name.into(),
            description: None,
            active: true,
            is_default: false,
            limits: PlanLimits::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }

    pub fn with_limits(mut self, limits: PlanLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    // Getters

    pub fn id(&self) -> PlanId {
        self.id
    }

    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_default(&self) -> bool {
        self.is_default
    }

    pub fn limits(&self) -> &PlanLimits {
        &self.limits
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    pub fn set_default(&mut self, is_default: bool) {
        self.is_default = is_default;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// A default plan must be active
    pub fn ensure_default_is_active(&self) -> Result<(), DomainError> {
        if self.is_default && !self.active {
            return Err(DomainError::validation(format!(
                "plan '{}' cannot be the default plan while inactive",
                self.code
            )));
        }
        Ok(())
    }

    /// Apply a partial update to the stored state of this plan
    ///
    /// Only fields present in `changes` are written. The default plan can only
    /// lose its flag by promoting another plan, and it cannot be deactivated
    /// while it is the default.
    pub fn apply(&mut self, changes: &PlanUpdate) -> Result<(), DomainError> {
        if changes.is_default == Some(false) && self.is_default {
            return Err(DomainError::validation(format!(
                "plan '{}' is the default plan; promote another plan instead",
                self.code
            )));
        }

        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(description) = &changes.description {
            self.description = description.clone();
        }
        if let Some(active) = changes.active {
            self.active = active;
        }
        if let Some(is_default) = changes.is_default {
            self.is_default = is_default;
        }
        if let Some(limits) = &changes.limits {
            self.limits = limits.clone();
        }

        self.touch();
        self.ensure_default_is_active()
    }
}

/// Partial plan update; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanUpdate {
    pub name: Option<String>,
    /// `Some(None)` clears the description
    pub description: Option<Option<String>>,
    pub active: Option<bool>,
    pub is_default: Option<bool>,
    pub limits: Option<PlanLimits>,
}

impl PlanUpdate {
    /// Whether the update explicitly makes the plan the default
    pub fn promotes(&self) -> bool {
        self.is_default == Some(true)
    }
}

/// Convert an arbitrary JSON payload into a limits map
///
/// `null` is treated as an empty map; anything other than an object is rejected.
pub fn limits_from_value(value: Value) -> Result<PlanLimits, DomainError> {
    match value {
        Value::Null => Ok(PlanLimits::new()),
        Value::Object(map) => Ok(map),
        _ => Err(DomainError::validation("limits must be a JSON object")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn test_plan() -> Plan {
        Plan::new(
            PlanId::from_uuid(Uuid::new_v4()),
            ProjectId::from_uuid(Uuid::new_v4()),
            "pro",
            "Pro",
        )
    }

    #[test]
    fn test_plan_defaults() {
        let plan = test_plan();

        assert!(plan.is_active());
        assert!(!plan.is_default());
        assert!(plan.limits().is_empty());
    }

    #[test]
    fn test_plan_limits_round_trip_through_json() {
        let limits = limits_from_value(json!({"max_projects": 10, "tier": "gold"})).unwrap();
        let plan = test_plan().with_limits(limits);

        let encoded = serde_json::to_value(&plan).unwrap();
        let decoded: Plan = serde_json::from_value(encoded).unwrap();

        assert_eq!(decoded.limits().get("max_projects"), Some(&json!(10)));
        assert_eq!(decoded, plan);
    }

    #[test]
    fn test_default_cannot_be_unset_directly() {
        let mut plan = test_plan().with_default(true);

        let err = plan
            .apply(&PlanUpdate {
                is_default: Some(false),
                ..Default::default()
            })
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
        assert!(plan.is_default());
    }

    #[test]
    fn test_default_cannot_be_deactivated() {
        let mut plan = test_plan().with_default(true);

        let result = plan.apply(&PlanUpdate {
            active: Some(false),
            ..Default::default()
        });

        assert!(result.is_err());
    }

    #[test]
    fn test_apply_only_touches_present_fields() {
        let mut plan = test_plan()
            .with_description(Some("Paid tier".to_string()))
            .with_limits(limits_from_value(json!({"seats": 5})).unwrap());

        plan.apply(&PlanUpdate {
            name: Some("Pro Plus".to_string()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(plan.name(), "Pro Plus");
        assert_eq!(plan.description(), Some("Paid tier"));
        assert_eq!(plan.limits().get("seats"), Some(&json!(5)));
        assert!(!plan.is_default());

        plan.apply(&PlanUpdate {
            description: Some(None),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(plan.description(), None);
    }

    #[test]
    fn test_non_default_transitions_allowed() {
        let mut plan = test_plan();
        assert!(plan
            .apply(&PlanUpdate {
                active: Some(false),
                ..Default::default()
            })
            .is_ok());

        let mut promoted = test_plan();
        let changes = PlanUpdate {
            is_default: Some(true),
            ..Default::default()
        };
        assert!(changes.promotes());
        assert!(promoted.apply(&changes).is_ok());
        assert!(promoted.is_default());
    }

    #[test]
    fn test_limits_from_value() {
        assert!(limits_from_value(Value::Null).unwrap().is_empty());
        assert!(limits_from_value(json!([1, 2])).is_err());
        assert!(limits_from_value(json!("unlimited")).is_err());
    }
}
