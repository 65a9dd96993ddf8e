//! Entity identifiers and the identifier generator

use std::fmt::Debug;

use uuid::Uuid;

use super::DomainError;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim())
                    .map(Self)
                    .map_err(|_| DomainError::validation(format!("invalid {} ID: '{}'", $label, s)))
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

uuid_id!(
    /// Project identifier
    ProjectId,
    "project"
);
uuid_id!(
    /// Plan identifier
    PlanId,
    "plan"
);
uuid_id!(
    /// Feature identifier
    FeatureId,
    "feature"
);
uuid_id!(
    /// Plan-feature assignment identifier
    PlanFeatureId,
    "plan feature"
);
uuid_id!(
    /// Tenant plan assignment identifier
    TenantPlanId,
    "assignment"
);
uuid_id!(
    /// API key identifier
    ApiKeyId,
    "API key"
);

const MAX_TENANT_ID_LENGTH: usize = 255;

/// Tenant identifier supplied by the caller; this system does not own tenants
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(String);

impl TenantId {
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        let trimmed = id.trim();

        if trimmed.is_empty() {
            return Err(DomainError::validation("tenant ID is required"));
        }

        if trimmed.len() > MAX_TENANT_ID_LENGTH {
            return Err(DomainError::validation(format!(
                "tenant ID exceeds maximum length of {} characters",
                MAX_TENANT_ID_LENGTH
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TenantId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TenantId> for String {
    fn from(id: TenantId) -> Self {
        id.0
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Supplies globally unique identifiers for new entities
pub trait IdGenerator: Send + Sync + Debug {
    fn next_id(&self) -> Uuid;
}

/// Random (v4) UUID generator
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let raw = "6f1c2a4e-8a9b-4d5e-9f00-112233445566";
        let id: PlanId = raw.parse().unwrap();
        assert_eq!(id.to_string(), raw);
    }

    #[test]
    fn test_parse_invalid_id() {
        let err = "not-a-uuid".parse::<ProjectId>().unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = FeatureId::from_uuid(Uuid::nil());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"00000000-0000-0000-0000-000000000000\"");
    }

    #[test]
    fn test_tenant_id_trimmed() {
        let id = TenantId::new("  tenant-42 ").unwrap();
        assert_eq!(id.as_str(), "tenant-42");
    }

    #[test]
    fn test_tenant_id_invalid() {
        assert!(TenantId::new("   ").is_err());
        assert!(TenantId::new("x".repeat(256)).is_err());
    }

    #[test]
    fn test_uuid_generator_unique() {
        let generator = UuidGenerator;
        assert_ne!(generator.next_id(), generator.next_id());
    }
}
