//! API key entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::id::{ApiKeyId, ProjectId};

/// Number of characters of the key's random part kept as a display/lookup prefix
pub const KEY_PREFIX_LENGTH: usize = 8;

/// Stored API key metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiKey {
    id: ApiKeyId,
    project_id: ProjectId,
    /// Format: algorithm$digest (e.g. "sha256$...").
    /// Stored but never exposed in API responses.
    #[serde(skip_serializing, default)]
    key_hash: String,
    key_prefix: String,
    revoked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    revoked_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl ApiKey {
    /// Create a new, active key record
    pub fn new(
        id: ApiKeyId,
        project_id: ProjectId,
        key_hash: impl Into<String>,
        key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            id,
            project_id,
            key_hash: key_hash.into(),
            key_prefix: key_prefix.into(),
            revoked: false,
            revoked_at: None,
            created_at: Utc::now(),
        }
    }

    /// Rebuild revocation state when loading from storage
    pub fn with_revocation(mut self, revoked: bool, revoked_at: Option<DateTime<Utc>>) -> Self {
        self.revoked = revoked;
        self.revoked_at = revoked_at;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    // Getters

    pub fn id(&self) -> ApiKeyId {
        self.id
    }

    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    pub fn key_hash(&self) -> &str {
        &self.key_hash
    }

    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked
    }

    pub fn is_active(&self) -> bool {
        !self.revoked
    }

    pub fn revoked_at(&self) -> Option<DateTime<Utc>> {
        self.revoked_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Revoke the key. Revoking twice keeps the first timestamp.
    pub fn revoke(&mut self) {
        if !self.revoked {
            self.revoked = true;
            self.revoked_at = Some(Utc::now());
        }
    }
}
