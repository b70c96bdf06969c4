//! Error types for the gateway and their translation into HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

/// Every failure the request handlers can report to a caller.
///
/// Each variant is built at the site where the failure is detected and
/// carries the complete client-facing message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// The client sent something we cannot work with
    #[error("{0}")]
    BadRequest(String),

    /// The upstream call did not finish within the configured bound
    #[error("Ollama API request timeout: {0}")]
    UpstreamTimeout(String),

    /// The upstream could not be reached at all
    #[error("Cannot connect to Ollama at {url}. Make sure Ollama is running.")]
    UpstreamUnreachable { url: String },

    /// The upstream answered with a body we could not parse
    #[error("Invalid JSON response from Ollama: {0}")]
    UpstreamProtocol(String),

    /// Any other transport or status failure on the upstream call
    #[error("Failed to call Ollama API: {0}")]
    UpstreamRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Result alias used by the request handlers
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// JSON body returned on every failure path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

impl GatewayError {
    pub fn body_required() -> Self {
        GatewayError::BadRequest("Request body is required".to_string())
    }

    pub fn prompt_required() -> Self {
        GatewayError::BadRequest("Prompt is required".to_string())
    }

    /// HTTP status reported for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::UpstreamUnreachable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::UpstreamProtocol(_)
            | GatewayError::UpstreamRequest(_)
            | GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Classify a failed upstream call.
    ///
    /// `base_url` is the rewritten base address, reported back to the caller
    /// when the upstream cannot be reached.
    pub fn from_upstream(err: reqwest::Error, base_url: &str) -> Self {
        if err.is_timeout() {
            GatewayError::UpstreamTimeout(err.to_string())
        } else if err.is_connect() {
            GatewayError::UpstreamUnreachable {
                url: base_url.to_string(),
            }
        } else {
            GatewayError::UpstreamRequest(err.to_string())
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            error!(status = status.as_u16(), "{}", message);
        } else {
            warn!(status = status.as_u16(), "{}", message);
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(GatewayError::prompt_required().status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            GatewayError::UpstreamTimeout("operation timed out".into()).status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            GatewayError::UpstreamUnreachable { url: "http://host.docker.internal:11434".into() }
                .status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            GatewayError::UpstreamProtocol("expected value".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            GatewayError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(GatewayError::body_required().to_string(), "Request body is required");
        assert_eq!(
            GatewayError::UpstreamUnreachable { url: "http://host.docker.internal:11434".into() }
                .to_string(),
            "Cannot connect to Ollama at http://host.docker.internal:11434. Make sure Ollama is running."
        );
        assert!(GatewayError::UpstreamTimeout("operation timed out".into())
            .to_string()
            .contains("timeout"));
        assert_eq!(
            GatewayError::UpstreamRequest("HTTP status server error (500)".into()).to_string(),
            "Failed to call Ollama API: HTTP status server error (500)"
        );
    }
}
