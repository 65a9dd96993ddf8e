//! Project entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::id::ProjectId;

/// Project entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    /// Normalized code, immutable after creation
    code: String,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Project {
    /// Create a new active project. `code` must already be normalized.
    pub fn new(id: ProjectId, code: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();

        Self {
            id,
            code: code.into(),
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

    /// Rebuild timestamps when loading from storage
    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    // Getters

    pub fn id(&self) -> ProjectId {
        self.id
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

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Apply a partial update
    pub fn apply(&mut self, changes: &ProjectUpdate) {
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

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Fields to change on an existing project, `None` leaves a field as stored
///
/// `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_project_creation() {
        let project = Project::new(ProjectId::from_uuid(Uuid::new_v4()), "acme", "Acme Inc")
            .with_description(Some("Main tenant".into()));

        assert_eq!(project.code(), "acme");
        assert_eq!(project.name(), "Acme Inc");
        assert_eq!(project.description(), Some("Main tenant"));
        assert!(project.is_active());
    }

    #[test]
    fn test_project_deactivate_touches() {
        let mut project = Project::new(ProjectId::from_uuid(Uuid::new_v4()), "acme", "Acme");
        let before = project.updated_at();

        project.apply(&ProjectUpdate {
            active: Some(false),
            ..Default::default()
        });

        assert!(!project.is_active());
        assert!(project.updated_at() >= before);
    }

    #[test]
    fn test_apply_keeps_absent_fields() {
        let mut project = Project::new(ProjectId::from_uuid(Uuid::new_v4()), "acme", "Acme")
            .with_description(Some("Main tenant".into()));

        project.apply(&ProjectUpdate {
            name: Some("Acme Corp".into()),
            ..Default::default()
        });
        assert_eq!(project.name(), "Acme Corp");
        assert_eq!(project.description(), Some("Main tenant"));
        assert!(project.is_active());

        project.apply(&ProjectUpdate {
            description: Some(None),
            ..Default::default()
        });
        assert_eq!(project.name(), "Acme Corp");
        assert_eq!(project.description(), None);
    }
}
