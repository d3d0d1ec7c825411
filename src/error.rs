//! Error types for insta-bridge
//!
//! This module provides the error handling used across the crate:
//! - A crate-wide [`Error`] enum with one variant per failure class
//! - HTTP status code mapping for the API layer ([`ToHttpStatus`])
//! - The JSON error body sent inside the response envelope ([`ApiError`])
//!
//! Component-level errors ([`StrategyError`](crate::instagram::StrategyError),
//! [`SummarizeError`](crate::summarize::SummarizeError),
//! [`PublishError`](crate::posting::PublishError)) stay inside their modules and
//! are converted into [`Error`] at the boundary.

use crate::workflow::Stage;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for insta-bridge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Message shown instead of internal error details outside development mode
pub const REDACTED_MESSAGE: &str = "An unexpected error occurred";

/// Main error type for insta-bridge
#[derive(Debug, Error)]
pub enum Error {
    /// Request failed validation (bad shape, missing field, out-of-range value)
    #[error("{0}")]
    Validation(String),

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The environment variable that caused the error (e.g., "PORT")
        key: Option<String>,
    },

    /// An upstream call (scraper, LLM, X.com) failed
    #[error("{service} error: {message}")]
    Upstream {
        /// Name of the upstream service ("instagram", "llm", "x.com")
        service: String,
        /// Failure description
        message: String,
    },

    /// The posting capability refused the request for lack of access scope
    #[error("{message}")]
    Permission {
        /// Failure description
        message: String,
        /// Remediation hint shown to the caller
        help: String,
    },

    /// The workflow aborted at a named stage
    #[error("workflow failed at {stage} stage: {message}")]
    Workflow {
        /// The stage that failed
        stage: Stage,
        /// Failure description
        message: String,
    },

    /// Route or resource not found
    #[error("resource not found: {0}")]
    NotFound(String),

    /// Missing or invalid credentials on a protected endpoint
    #[error("{0}")]
    Unauthorized(String),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unexpected internal error
    #[error("{0}")]
    Internal(String),
}

impl Error {
    /// Shorthand for a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Shorthand for a configuration error tied to an environment variable
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Shorthand for an upstream failure
    pub fn upstream(service: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Upstream {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Whether the message of this error may leak implementation details
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Error::Internal(_) | Error::Io(_) | Error::Serialization(_)
        )
    }

    /// Replace internal error details with a generic message when `redact` is set
    pub fn redacted(self, redact: bool) -> Self {
        if redact && self.is_internal() {
            Error::Internal(REDACTED_MESSAGE.to_string())
        } else {
            self
        }
    }
}

/// Error body carried by the response envelope
///
/// # Example JSON
///
/// ```json
/// {
///   "message": "Text to summarize is required",
///   "code": "VALIDATION_ERROR"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Human-readable error message
    pub message: String,

    /// Machine-readable error code (e.g., "VALIDATION_ERROR")
    pub code: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            details: None,
        }
    }

    /// Create an API error with additional details
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            details: Some(details),
        }
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            Error::Validation(_) => 400,
            Error::Unauthorized(_) => 401,
            Error::Permission { .. } => 403,
            Error::NotFound(_) => 404,

            // The workflow reports every stage failure as a server-side failure
            Error::Workflow { .. } => 500,

            Error::Upstream { .. } => 502,
            Error::Network(_) => 502,

            Error::Config { .. } => 500,
            Error::Serialization(_) => 500,
            Error::Io(_) => 500,
            Error::Internal(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::Config { .. } => "CONFIG_ERROR",
            Error::Upstream { .. } => "UPSTREAM_ERROR",
            Error::Permission { .. } => "PERMISSION_ERROR",
            Error::Workflow { .. } => "WORKFLOW_ERROR",
            Error::NotFound(_) => "NOT_FOUND",
            Error::Unauthorized(_) => "UNAUTHORIZED",
            Error::Network(_) => "NETWORK_ERROR",
            Error::Serialization(_) => "SERIALIZATION_ERROR",
            Error::Io(_) => "IO_ERROR",
            Error::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        let details = match &error {
            Error::Config { key: Some(key), .. } => Some(serde_json::json!({
                "key": key,
            })),
            Error::Upstream { service, .. } => Some(serde_json::json!({
                "service": service,
            })),
            Error::Permission { help, .. } => Some(serde_json::json!({
                "helpText": help,
            })),
            Error::Workflow { stage, .. } => Some(serde_json::json!({
                "stage": stage,
            })),
            _ => None,
        };

        ApiError {
            message,
            code,
            details,
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn all_error_variants() -> Vec<(Error, u16, &'static str)> {
        vec![
            (Error::validation("bad"), 400, "VALIDATION_ERROR"),
            (Error::config("PORT", "not a number"), 500, "CONFIG_ERROR"),
            (Error::upstream("llm", "timeout"), 502, "UPSTREAM_ERROR"),
            (
                Error::Permission {
                    message: "denied".into(),
                    help: "grant write".into(),
                },
                403,
                "PERMISSION_ERROR",
            ),
            (
                Error::Workflow {
                    stage: Stage::Posting,
                    message: "boom".into(),
                },
                500,
                "WORKFLOW_ERROR",
            ),
            (Error::NotFound("/nope".into()), 404, "NOT_FOUND"),
            (Error::Unauthorized("no token".into()), 401, "UNAUTHORIZED"),
            (
                Error::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk")),
                500,
                "IO_ERROR",
            ),
            (Error::Internal("oops".into()), 500, "INTERNAL_SERVER_ERROR"),
        ]
    }

    #[test]
    fn test_status_and_code_for_every_variant() {
        for (error, status, code) in all_error_variants() {
            assert_eq!(error.status_code(), status, "status for {error:?}");
            assert_eq!(error.error_code(), code, "code for {error:?}");
        }
    }

    #[test]
    fn test_permission_error_carries_help_text() {
        let api_error: ApiError = Error::Permission {
            message: "Your app needs Read and Write permissions".into(),
            help: "Update the app in the developer portal".into(),
        }
        .into();

        assert_eq!(api_error.code, "PERMISSION_ERROR");
        assert_eq!(
            api_error.details.unwrap()["helpText"],
            "Update the app in the developer portal"
        );
    }

    #[test]
    fn test_workflow_error_details_name_the_stage() {
        let api_error: ApiError = Error::Workflow {
            stage: Stage::Posting,
            message: "rate limited".into(),
        }
        .into();

        assert!(api_error.message.contains("posting"));
        assert_eq!(api_error.details.unwrap()["stage"], "posting");
    }

    #[test]
    fn test_redaction_only_touches_internal_errors() {
        let redacted = Error::Internal("stack trace here".into()).redacted(true);
        assert_eq!(redacted.to_string(), REDACTED_MESSAGE);

        let kept = Error::Internal("stack trace here".into()).redacted(false);
        assert_eq!(kept.to_string(), "stack trace here");

        let validation = Error::validation("Text to summarize is required").redacted(true);
        assert_eq!(validation.to_string(), "Text to summarize is required");
    }
}
