//! Plan & Feature entitlements service
//!
//! Multi-tenant plans, features and API keys per project:
//! - Projects own plans, features and one active API key
//! - Plans carry typed feature values and optional limits
//! - Tenants resolve to an assigned plan or the project's default plan

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use anyhow::Context;
use api::state::AppState;
use domain::UuidGenerator;
use infrastructure::storage::StorageFactory;
use tracing::{info, warn};

/// Create the application state for the configured storage backend
///
/// PostgreSQL migrations are applied while the repositories are created.
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage = config
        .storage
        .to_storage_config()
        .map_err(anyhow::Error::msg)
        .context("Invalid storage configuration")?;

    info!(backend = ?storage.storage_type(), "Initializing storage");
    let repositories = StorageFactory::create(&storage)
        .await
        .context("Failed to initialize storage")?;

    let state = AppState::new(repositories, Arc::new(UuidGenerator))
        .with_admin_key(config.admin.api_key.clone());

    if state.admin_key().is_none() {
        warn!("No admin key configured, admin routes will reject every request");
    }

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_app_state_in_memory() {
        let mut config = AppConfig::default();
        config.admin.api_key = Some("  secret ".to_string());

        let state = create_app_state(&config).await.unwrap();

        assert_eq!(state.admin_key(), Some("secret"));
        assert!(state.ping_storage().await.is_ok());
    }

    #[tokio::test]
    async fn test_create_app_state_rejects_unknown_backend() {
        let mut config = AppConfig::default();
        config.storage.backend = "redis".to_string();

        assert!(create_app_state(&config).await.is_err());
    }
}
