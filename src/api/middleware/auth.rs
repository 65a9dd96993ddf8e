//! Project API key authentication

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::ProjectId;

/// Extractor that requires a valid project API key
///
/// The key is read from `Authorization: Bearer <key>` or `X-API-Key: <key>`
/// and resolves to the project that owns it.
#[derive(Debug, Clone, Copy)]
pub struct RequireProject(pub ProjectId);

impl FromRequestParts<AppState> for RequireProject {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw_key = extract_bearer_or_header(&parts.headers, "x-api-key")?.ok_or_else(|| {
            ApiError::unauthorized(
                "API key required. Provide via 'Authorization: Bearer <key>' or 'X-API-Key: <key>' header",
            )
            .with_code("missing_key")
        })?;

        let project_id = state.api_key_service.validate(&raw_key).await?;

        debug!(project_id = %project_id, "Project authenticated");
        Ok(RequireProject(project_id))
    }
}

/// Read a credential from the Bearer token or the named header
///
/// The Bearer token wins when both are present.
pub fn extract_bearer_or_header(
    headers: &HeaderMap,
    header_name: &str,
) -> Result<Option<String>, ApiError> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| ApiError::bad_request("Invalid Authorization header encoding"))?;

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(Some(token.trim().to_string()));
        }
    }

    if let Some(value) = headers.get(header_name) {
        let value = value
            .to_str()
            .map_err(|_| ApiError::bad_request(format!("Invalid {} header encoding", header_name)))?;

        return Ok(Some(value.trim().to_string()));
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer pfk_abc".parse().unwrap());

        let key = extract_bearer_or_header(&headers, "x-api-key").unwrap();
        assert_eq!(key.as_deref(), Some("pfk_abc"));
    }

    #[test]
    fn test_extract_named_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", " pfk_xyz ".parse().unwrap());

        let key = extract_bearer_or_header(&headers, "x-api-key").unwrap();
        assert_eq!(key.as_deref(), Some("pfk_xyz"));
    }

    #[test]
    fn test_bearer_takes_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer pfk_bearer".parse().unwrap());
        headers.insert("x-api-key", "pfk_header".parse().unwrap());

        let key = extract_bearer_or_header(&headers, "x-api-key").unwrap();
        assert_eq!(key.as_deref(), Some("pfk_bearer"));
    }

    #[test]
    fn test_missing_or_non_bearer() {
        assert_eq!(extract_bearer_or_header(&HeaderMap::new(), "x-api-key").unwrap(), None);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());
        assert_eq!(extract_bearer_or_header(&headers, "x-api-key").unwrap(), None);
    }
}
