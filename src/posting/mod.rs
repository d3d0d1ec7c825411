//! Publishing summaries to X.com
//!
//! The [`Publisher`] trait is the narrow capability the rest of the crate
//! depends on. Two implementations are provided:
//!
//! - [`TwitterPublisher`]: OAuth 1.0a signed calls to the X.com API, with
//!   optional media upload
//! - [`MockPublisher`]: used when no credentials are configured; returns a
//!   synthetic receipt without any network traffic

mod mock;
pub mod oauth;
mod twitter;

pub use mock::MockPublisher;
pub use twitter::TwitterPublisher;

use crate::config::PostingConfig;
use crate::error::{Error, Result};
use crate::retry::IsRetryable;
use crate::types::PostReceipt;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Message returned when the X.com app lacks write access
pub const PERMISSION_MESSAGE: &str = "Your Twitter app needs Read and Write permissions. Please update your app in the Twitter Developer Portal.";

/// Remediation hint attached to permission failures
pub const PERMISSION_HELP: &str =
    "Update your app in Twitter Developer Portal to have Read and Write permissions";

/// Why a post could not be published
#[derive(Debug, Error)]
pub enum PublishError {
    /// The app is not allowed to write on behalf of the user
    #[error("{}", PERMISSION_MESSAGE)]
    Permission,

    /// The API answered with an error status
    #[error("X.com API returned HTTP {status}: {message}")]
    Rejected {
        /// Response status code
        status: u16,
        /// Error detail from the response
        message: String,
    },

    /// The request never produced a response
    #[error("request to X.com failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered 2xx with an unexpected body
    #[error("unexpected X.com response: {0}")]
    InvalidResponse(String),

    /// The post itself is not acceptable
    #[error("{0}")]
    InvalidInput(String),
}

impl PublishError {
    /// Whether the failure is a missing write permission
    pub fn is_permission(&self) -> bool {
        matches!(self, PublishError::Permission)
    }
}

impl IsRetryable for PublishError {
    fn is_retryable(&self) -> bool {
        // Only retry when the request never reached the server
        matches!(self, PublishError::Transport(e) if e.is_connect())
    }
}

impl From<PublishError> for Error {
    fn from(error: PublishError) -> Self {
        match error {
            PublishError::Permission => Error::Permission {
                message: PERMISSION_MESSAGE.to_string(),
                help: PERMISSION_HELP.to_string(),
            },
            PublishError::InvalidInput(message) => Error::Validation(message),
            other => Error::upstream("x.com", other.to_string()),
        }
    }
}

/// Something that can publish a short text with an optional image
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Whether posts actually reach X.com
    fn is_live(&self) -> bool;

    /// Publish `text`, attaching the image at `image_url` when possible
    ///
    /// A failed image attachment does not fail the post; it is published as
    /// text only.
    async fn publish(
        &self,
        text: &str,
        image_url: Option<&str>,
    ) -> std::result::Result<PostReceipt, PublishError>;
}

/// Publisher for the given configuration: live with credentials, mock without
pub fn publisher_from_config(config: &PostingConfig) -> Result<Arc<dyn Publisher>> {
    match &config.credentials {
        Some(credentials) => {
            tracing::info!("X.com client initialized");
            Ok(Arc::new(TwitterPublisher::new(credentials.clone(), config)?))
        }
        None => {
            tracing::warn!("X.com credentials not provided or incomplete, posts are simulated");
            Ok(Arc::new(MockPublisher))
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TwitterCredentials;

    #[test]
    fn test_permission_error_conversion() {
        let error: Error = PublishError::Permission.into();
        match error {
            Error::Permission { message, help } => {
                assert_eq!(message, PERMISSION_MESSAGE);
                assert_eq!(help, PERMISSION_HELP);
            }
            other => panic!("expected permission error, got {other:?}"),
        }
    }

    #[test]
    fn test_rejection_becomes_upstream_error() {
        let error: Error = PublishError::Rejected {
            status: 429,
            message: "Too Many Requests".into(),
        }
        .into();
        assert!(matches!(error, Error::Upstream { ref service, .. } if service == "x.com"));
    }

    #[test]
    fn test_publisher_selection() {
        let mut config = PostingConfig::default();
        assert!(!publisher_from_config(&config).unwrap().is_live());

        config.credentials = Some(TwitterCredentials {
            api_key: "k".into(),
            api_secret: "s".into(),
            access_token: "t".into(),
            access_secret: "ts".into(),
        });
        assert!(publisher_from_config(&config).unwrap().is_live());
    }
}
