//! Feature entity and value kinds

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::id::{FeatureId, ProjectId};
use crate::domain::DomainError;

/// Declared value kind of a feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    /// On/off switch, values are booleans
    Flag,
    /// Quantities such as seat counts, values are numbers
    Numeric,
    /// Free-form setting, values are strings
    Value,
}

impl FeatureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flag => "flag",
            Self::Numeric => "numeric",
            Self::Value => "value",
        }
    }

    /// Human readable name of the JSON type this kind accepts
    pub fn expected_type(&self) -> &'static str {
        match self {
            Self::Flag => "boolean",
            Self::Numeric => "number",
            Self::Value => "string",
        }
    }

    /// Check whether a value has the runtime type this kind requires
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Flag => value.is_boolean(),
            Self::Numeric => value.is_number(),
            Self::Value => value.is_string(),
        }
    }

    /// Validate a value against this kind
    pub fn check(&self, feature_code: &str, value: &Value) -> Result<(), DomainError> {
        if self.accepts(value) {
            Ok(())
        } else {
            Err(DomainError::type_mismatch(
                feature_code,
                self.expected_type(),
                json_type_name(value),
            ))
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FeatureKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "flag" => Ok(Self::Flag),
            "numeric" => Ok(Self::Numeric),
            "value" => Ok(Self::Value),
            other => Err(DomainError::validation(format!(
                "invalid feature kind '{}': expected flag, numeric or value",
                other
            ))),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Feature entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    id: FeatureId,
    project_id: ProjectId,
    code: String,
    /// Immutable after creation
    kind: FeatureKind,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Feature {
    /// Create a new active feature. `code` must already be normalized.
    pub fn new(
        id: FeatureId,
        project_id: ProjectId,
        code: impl Into<String>,
        kind: FeatureKind,
        name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            project_id,
            code: code.into(),
            kind,
            name: name.into(),
            description: None,
            active: true,
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

    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    pub fn id(&self) -> FeatureId {
        self.id
    }

    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn kind(&self) -> FeatureKind {
        self.kind
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

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Apply a partial update
    pub fn apply(&mut self, changes: &FeatureUpdate) {
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(description) = &changes.description {
            self.description = description.clone();
        }
        if let Some(active) = changes.active {
            self.active = active;
        }
        self.touch();
    }

    /// Validate a value against this feature's declared kind
    pub fn check_value(&self, value: &Value) -> Result<(), DomainError> {
        self.kind.check(&self.code, value)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Fields to change on an existing feature; code and kind are immutable
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureUpdate {
    pub name: Option<String>,
    /// `Some(None)` clears the description
    pub description: Option<Option<String>>,
    pub active: Option<bool>,
}
