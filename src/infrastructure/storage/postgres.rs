//! PostgreSQL connection pooling and error mapping

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::domain::DomainError;

/// PostgreSQL storage configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Time to wait for a pooled connection before failing, in seconds
    pub acquire_timeout_secs: u64,
    /// Idle timeout in seconds
    pub idle_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/plan_entitlements".to_string(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_secs: 5,
            idle_timeout_secs: 600,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_acquire_timeout(mut self, secs: u64) -> Self {
        self.acquire_timeout_secs = secs;
        self
    }
}

/// Open a connection pool
pub async fn connect_pool(config: &PostgresConfig) -> Result<PgPool, DomainError> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect(&config.url)
        .await
        .map_err(|e| DomainError::unavailable(format!("Failed to connect to PostgreSQL: {}", e)))
}

/// Whether the error is a unique-constraint violation
pub fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

/// Map a storage failure onto the domain
///
/// Timeouts, pool exhaustion and driver errors are all surfaced as
/// `Unavailable`; callers decide whether to retry.
pub fn storage_error(context: &str, error: sqlx::Error) -> DomainError {
    match error {
        sqlx::Error::PoolTimedOut => {
            DomainError::unavailable(format!("{}: timed out waiting for a connection", context))
        }
        sqlx::Error::PoolClosed => {
            DomainError::unavailable(format!("{}: connection pool closed", context))
        }
        other => DomainError::unavailable(format!("{}: {}", context, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_config_default() {
        let config = PostgresConfig::default();

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.acquire_timeout_secs, 5);
    }

    #[test]
    fn test_postgres_config_builder() {
        let config = PostgresConfig::new("postgres://db/entitlements")
            .with_max_connections(20)
            .with_acquire_timeout(2);

        assert_eq!(config.url, "postgres://db/entitlements");
        assert_eq!(config.max_connections, 20);
        assert_eq!(config.acquire_timeout_secs, 2);
    }

    #[test]
    fn test_pool_timeout_is_unavailable() {
        let err = storage_error("Failed to get plan", sqlx::Error::PoolTimedOut);

        assert!(matches!(err, DomainError::Unavailable { .. }));
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_row_not_found_is_not_unique_violation() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }
}
