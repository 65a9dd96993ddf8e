//! Admin authentication
//!
//! Admin routes are guarded by a single configured key, presented as
//! `X-Admin-Key: <key>` or `Authorization: Bearer <key>`.

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::{debug, warn};

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::infrastructure::api_key::constant_time_compare;

use super::auth::extract_bearer_or_header;

/// Extractor that requires the admin key
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin;

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.admin_key() else {
            warn!("Admin request rejected: no admin key configured");
            return Err(ApiError::unauthorized("Admin access is not configured").with_code("admin_disabled"));
        };

        let provided = extract_bearer_or_header(&parts.headers, "x-admin-key")?
            .ok_or_else(|| ApiError::unauthorized("Admin key required").with_code("missing_key"))?;

        if !constant_time_compare(&provided, expected) {
            warn!("Admin request rejected: invalid admin key");
            return Err(ApiError::unauthorized("Invalid admin key").with_code("invalid_key"));
        }

        debug!("Admin access granted");
        Ok(RequireAdmin)
    }
}
