//! Plan-feature entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::id::{FeatureId, PlanFeatureId, PlanId, ProjectId};

/// A feature value granted by a plan
///
/// The value is stored as a generic JSON document. Its type is checked against
/// the feature kind before the assignment is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanFeature {
    id: PlanFeatureId,
    project_id: ProjectId,
    plan_id: PlanId,
    feature_id: FeatureId,
    value: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PlanFeature {
    pub fn new(
        id: PlanFeatureId,
        project_id: ProjectId,
        plan_id: PlanId,
        feature_id: FeatureId,
        value: Value,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            project_id,
            plan_id,
            feature_id,
            value,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    pub fn id(&self) -> PlanFeatureId {
        self.id
    }

    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    pub fn plan_id(&self) -> PlanId {
        self.plan_id
    }

    pub fn feature_id(&self) -> FeatureId {
        self.feature_id
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
