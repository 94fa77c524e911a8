//! Error types for the carrier gateway.
//!
//! Defines a unified error type that maps cleanly to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Unified error type for gateway operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Network failure or non-success HTTP status from the carrier.
    #[error("Carrier request failed: {0}")]
    Transport(String),

    /// Credential or token failure against the carrier.
    #[error("Carrier authentication failed: {0}")]
    Auth(String),

    /// Carrier returned data that could not be interpreted.
    #[error("Malformed carrier response: {0}")]
    MalformedResponse(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl GatewayError {
    /// Prefix a carrier failure with the operation it interrupted, e.g.
    /// "Error getting rates". Other errors are returned unchanged.
    pub fn during(self, operation: &str) -> Self {
        match self {
            GatewayError::Transport(msg) => {
                GatewayError::Transport(format!("{}: {}", operation, msg))
            }
            GatewayError::MalformedResponse(msg) => {
                GatewayError::MalformedResponse(format!("{}: {}", operation, msg))
            }
            other => other,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            GatewayError::MalformedResponse(e.to_string())
        } else {
            GatewayError::Transport(e.to_string())
        }
    }
}

/// Error response body for API clients.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            GatewayError::Transport(msg) => (
                StatusCode::BAD_GATEWAY,
                "CARRIER_REQUEST_FAILED",
                msg.clone(),
                None,
            ),
            GatewayError::Auth(msg) => {
                // Carrier credential problems are ours, not the caller's
                tracing::error!(error = %msg, "Carrier authentication error");
                (
                    StatusCode::BAD_GATEWAY,
                    "CARRIER_AUTH_FAILED",
                    "Could not authenticate with the carrier".to_string(),
                    None,
                )
            }
            GatewayError::MalformedResponse(msg) => (
                StatusCode::BAD_GATEWAY,
                "CARRIER_BAD_RESPONSE",
                msg.clone(),
                None,
            ),
            GatewayError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None)
            }
            GatewayError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone(), None)
            }
            GatewayError::Config(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                "Configuration error".to_string(),
                Some(msg.clone()),
            ),
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
