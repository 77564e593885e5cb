//! API Error Mapping
//!
//! Translates pipeline errors into HTTP responses. Production mode hides
//! underlying messages behind a generic 500; development mode exposes
//! them. Transient upstream exhaustion gets a retry hint.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

use crate::config::Environment;
use crate::types::DocweaveError;

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    #[serde(rename = "retryAdvice", skip_serializing_if = "Option::is_none")]
    pub retry_advice: Option<String>,
}

/// Route-level error carrying the deployment environment for redaction
pub struct ApiError {
    inner: DocweaveError,
    environment: Environment,
}

impl ApiError {
    pub fn new(inner: DocweaveError, environment: Environment) -> Self {
        Self { inner, environment }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, retry_advice) = map_error(&self.inner, self.environment);

        if status.is_server_error() {
            error!(error = %self.inner, "Request failed");
        }

        let body = ErrorBody {
            success: false,
            error: message,
            retry_advice,
        };
        (status, Json(body)).into_response()
    }
}

fn map_error(
    err: &DocweaveError,
    environment: Environment,
) -> (StatusCode, String, Option<String>) {
    match err {
        DocweaveError::InvalidUrl(_) | DocweaveError::InvalidInput(_) => {
            (StatusCode::BAD_REQUEST, err.to_string(), None)
        }
        DocweaveError::UpstreamAuth(_) => (StatusCode::UNAUTHORIZED, err.to_string(), None),
        DocweaveError::UpstreamNotFound(_) | DocweaveError::SessionNotFound(_) => {
            (StatusCode::NOT_FOUND, err.to_string(), None)
        }
        DocweaveError::UpstreamTransient(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Upstream service temporarily unavailable".to_string(),
            Some("Please try again in a few moments. The service is experiencing high traffic.".to_string()),
        ),
        DocweaveError::Llm(llm) if llm.is_retryable() => (
            StatusCode::INTERNAL_SERVER_ERROR,
            if environment.expose_errors() {
                err.to_string()
            } else {
                "AI service temporarily unavailable".to_string()
            },
            Some("Please try again in a few moments. The service is experiencing high traffic.".to_string()),
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            if environment.expose_errors() {
                err.to_string()
            } else {
                "Internal server error".to_string()
            },
            None,
        ),
    }
}
