use crate::chart::svg::RenderError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// API error type with HTTP status code mapping.
///
/// `Validation` is the only error whose message reaches the requester; every
/// other variant is an internal fault answered with a generic message.
#[derive(Debug)]
pub enum ApiError {
    /// Known, expected rejection of the request parameters.
    Validation(String),
    /// Request parameter that could not be parsed at all.
    Malformed(String),
    Render(RenderError),
    Internal(String),
    DatabaseError(duckdb::Error),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::Malformed(msg) => write!(f, "Malformed parameter: {msg}"),
            Self::Render(e) => write!(f, "{e}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
            Self::DatabaseError(e) => write!(f, "Database error: {e}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Validation(msg) => {
                tracing::debug!(reason = %msg, "Request rejected");
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            Self::Malformed(_) | Self::Render(_) | Self::Internal(_) | Self::DatabaseError(_) => {
                tracing::error!(error = %self, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, Json(body)).into_response()
    }
}

impl From<duckdb::Error> for ApiError {
    fn from(e: duckdb::Error) -> Self {
        Self::DatabaseError(e)
    }
}

impl From<RenderError> for ApiError {
    fn from(e: RenderError) -> Self {
        Self::Render(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;
    use http_body_util::BodyExt;

    #[test]
    fn test_validation_status() {
        let err = ApiError::Validation("you specified the date after 2009-01-31.".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_malformed_is_internal() {
        let err = ApiError::Malformed("start_year".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_render_error_status() {
        let err = ApiError::from(RenderError("bad input".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_error_status() {
        let err = ApiError::Internal("something broke".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_validation_message_reaches_body() {
        let err = ApiError::Validation("Invalid argument for 'type': bar".to_string());
        let body = err.into_response().into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Invalid argument for 'type': bar");
    }

    #[tokio::test]
    async fn test_internal_message_is_generic() {
        let err = ApiError::Malformed("start_year=abc".to_string());
        let body = err.into_response().into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Internal server error");
    }

    #[test]
    fn test_display() {
        let err = ApiError::Validation("test".to_string());
        assert_eq!(format!("{err}"), "Validation error: test");
    }
}
