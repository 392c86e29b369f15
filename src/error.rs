//! Error types for Searchlight
//!
//! `AssistantError` covers everything the orchestrator and recovery pipeline
//! can report. The façade never lets these reach a caller of its search
//! operations; they surface only in logs, metrics and the CLI.
//!
//! `AppError` is the HTTP-facing error and implements `IntoResponse` for Axum
//! handlers.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Failures raised while talking to the generative backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssistantError {
    #[error("Invalid assistant configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Network connectivity unavailable")]
    ConnectivityUnavailable,

    #[error("Request timed out after {timeout_seconds} seconds")]
    Timeout { timeout_seconds: u64 },

    #[error("Endpoint {endpoint} returned HTTP {status}")]
    EndpointHttpFailure { endpoint: String, status: u16 },

    #[error("Endpoint {endpoint} is rate limiting requests")]
    RateLimited { endpoint: String },

    #[error(
        "All {attempted} endpoints failed (last status: {}): {last_error}",
        status_label(.last_status)
    )]
    AllEndpointsFailed {
        attempted: usize,
        last_status: Option<u16>,
        last_error: String,
    },

    #[error("Malformed response envelope from {endpoint}: {reason}")]
    MalformedEnvelope { endpoint: String, reason: String },

    #[error("Could not recover {kind} output from model text: {preview}")]
    UnparsableOutput { kind: String, preview: String },

    #[error("Transport failure talking to {endpoint}: {message}")]
    Transport { endpoint: String, message: String },

    #[error("Request cancelled")]
    Cancelled,
}

fn status_label(status: &Option<u16>) -> String {
    status.map_or_else(|| "none".to_string(), |s| s.to_string())
}

impl AssistantError {
    /// Message suitable for showing to an end user
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidConfiguration(_) => {
                "The AI assistant is not configured. Showing offline suggestions instead."
            }
            Self::ConnectivityUnavailable => {
                "You appear to be offline. Check your internet connection and try again."
            }
            Self::Timeout { .. } | Self::Cancelled => {
                "The AI service took too long to respond. Please try again."
            }
            Self::EndpointHttpFailure { .. } | Self::Transport { .. } => {
                "The AI service returned an error. Please try again shortly."
            }
            Self::RateLimited { .. } => {
                "The AI service is busy right now. Showing offline suggestions instead."
            }
            Self::AllEndpointsFailed { .. } => {
                "The AI service is temporarily unavailable. Please try again later."
            }
            Self::MalformedEnvelope { .. } | Self::UnparsableOutput { .. } => {
                "The AI service returned an unexpected response."
            }
        }
    }

    /// Whether the failure ultimately came from backend throttling
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Self::RateLimited { .. } => true,
            Self::AllEndpointsFailed { last_status, .. } => *last_status == Some(429),
            _ => false,
        }
    }

    /// Short label used in logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidConfiguration(_) => "invalid_configuration",
            Self::ConnectivityUnavailable => "connectivity_unavailable",
            Self::Timeout { .. } => "timeout",
            Self::EndpointHttpFailure { .. } => "endpoint_http_failure",
            Self::RateLimited { .. } => "rate_limited",
            Self::AllEndpointsFailed { .. } => "all_endpoints_failed",
            Self::MalformedEnvelope { .. } => "malformed_envelope",
            Self::UnparsableOutput { .. } => "unparsable_output",
            Self::Transport { .. } => "transport",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read configuration file {path}: {source}")]
    ConfigFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration file {path}: {source}")]
    ConfigParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration in {path}: {reason}")]
    ConfigValidationFailed { path: String, reason: String },

    #[error("Invalid request: {0}")]
    Validation(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            Self::ConfigFileRead { .. }
            | Self::ConfigParseFailed { .. }
            | Self::ConfigValidationFailed { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

/// Convenience type alias for Results
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_creates() {
        let err = AppError::Config("test error".to_string());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_validation_error_response_status() {
        let err = AppError::Validation("query must not be empty".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_all_endpoints_failed_display() {
        let err = AssistantError::AllEndpointsFailed {
            attempted: 3,
            last_status: Some(503),
            last_error: "Endpoint b returned HTTP 503".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "All 3 endpoints failed (last status: 503): Endpoint b returned HTTP 503"
        );

        let err = AssistantError::AllEndpointsFailed {
            attempted: 2,
            last_status: None,
            last_error: "connection reset".to_string(),
        };
        assert!(err.to_string().contains("last status: none"));
    }

    #[test]
    fn test_rate_limit_classification() {
        assert!(
            AssistantError::RateLimited {
                endpoint: "a".to_string()
            }
            .is_rate_limited()
        );
        assert!(
            AssistantError::AllEndpointsFailed {
                attempted: 2,
                last_status: Some(429),
                last_error: String::new(),
            }
            .is_rate_limited()
        );
        assert!(
            !AssistantError::EndpointHttpFailure {
                endpoint: "a".to_string(),
                status: 500
            }
            .is_rate_limited()
        );
    }

    #[test]
    fn test_user_messages_are_distinct_for_surfaced_errors() {
        let surfaced = [
            AssistantError::Timeout {
                timeout_seconds: 30,
            },
            AssistantError::ConnectivityUnavailable,
            AssistantError::AllEndpointsFailed {
                attempted: 3,
                last_status: Some(500),
                last_error: String::new(),
            },
            AssistantError::MalformedEnvelope {
                endpoint: "a".to_string(),
                reason: "no candidates".to_string(),
            },
        ];
        let messages: std::collections::HashSet<_> =
            surfaced.iter().map(|e| e.user_message()).collect();
        assert_eq!(messages.len(), surfaced.len());
    }
}
