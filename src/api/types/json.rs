//! JSON extractor whose rejections use the API error envelope

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::de::DeserializeOwned;

use super::error::{ApiError, ApiErrorType};

/// `axum::Json` wrapper
///
/// Malformed or mistyped bodies are rejected with `400` and an
/// `invalid_request_error` envelope instead of axum's plain-text `422`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        AxumJson::<T>::from_request(req, state)
            .await
            .map(|AxumJson(value)| Json(value))
            .map_err(rejection_to_error)
    }
}

impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

/// Parse a body that may be absent
///
/// An empty or whitespace-only body yields `None`.
pub fn parse_optional_body<T: DeserializeOwned>(body: &[u8]) -> Result<Option<T>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| ApiError::bad_request(format!("Invalid JSON data: {}", e)).with_code("invalid_body"))
}

fn rejection_to_error(rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            ApiError::bad_request(format!("Invalid JSON data: {}", err.body_text()))
                .with_code("invalid_body")
        }
        JsonRejection::JsonSyntaxError(err) => {
            ApiError::bad_request(format!("Invalid JSON syntax: {}", err.body_text()))
                .with_code("invalid_body")
        }
        JsonRejection::MissingJsonContentType(_) => ApiError::new(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiErrorType::InvalidRequestError,
            "Missing Content-Type header. Expected 'application/json'.",
        )
        .with_code("unsupported_media_type"),
        other => ApiError::new(other.status(), ApiErrorType::InvalidRequestError, other.body_text())
            .with_code("invalid_body"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct PlanBody {
        code: String,
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_extracts_valid_body() {
        let Json(body) = Json::<PlanBody>::from_request(json_request(r#"{"code":"pro"}"#), &())
            .await
            .unwrap();

        assert_eq!(body.code, "pro");
    }

    #[tokio::test]
    async fn test_mistyped_body_is_bad_request() {
        let err = Json::<PlanBody>::from_request(json_request(r#"{"code":42}"#), &())
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.response.error.code.as_deref(), Some("invalid_body"));
    }

    #[tokio::test]
    async fn test_syntax_error_is_bad_request() {
        let err = Json::<PlanBody>::from_request(json_request("{"), &())
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_content_type() {
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(r#"{"code":"pro"}"#))
            .unwrap();

        let err = Json::<PlanBody>::from_request(request, &()).await.unwrap_err();
        assert_eq!(err.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn test_parse_optional_body() {
        assert_eq!(parse_optional_body::<PlanBody>(b"").unwrap(), None);
        assert_eq!(parse_optional_body::<PlanBody>(b"  \n").unwrap(), None);
        assert_eq!(
            parse_optional_body::<PlanBody>(br#"{"code":"a"}"#).unwrap(),
            Some(PlanBody { code: "a".to_string() })
        );
        assert!(parse_optional_body::<PlanBody>(b"nope").is_err());
    }
}
