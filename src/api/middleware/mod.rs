//! API middleware components

pub mod admin_auth;
pub mod auth;
pub mod metrics;

pub use admin_auth::RequireAdmin;
pub use auth::{extract_bearer_or_header, RequireProject};
pub use metrics::metrics_middleware;
