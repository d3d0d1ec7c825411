//! Route handlers for the REST API
//!
//! Handlers are organized by capability:
//! - [`instagram`] — Latest post retrieval
//! - [`summarize`] — Caption summarization
//! - [`posting`] — Publishing to X.com
//! - [`workflow`] — The full relay
//! - [`system`] — Health, home, OpenAPI, debug info

use crate::error::Error;
use crate::types::Post;
use axum::extract::FromRequest;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

mod instagram;
mod posting;
mod summarize;
mod system;
mod workflow;

// Re-export all handlers so `routes::function_name` works
pub use instagram::*;
pub use posting::*;
pub use summarize::*;
pub use system::*;
pub use workflow::*;

/// JSON body extractor whose rejections use the response envelope
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct JsonBody<T>(pub T);

// ============================================================================
// Query/Request Types (shared across handlers)
// ============================================================================

/// Query parameters for GET /latest-post
#[derive(Debug, Default, Deserialize, Serialize, ToSchema, utoipa::IntoParams)]
pub struct LatestPostQuery {
    /// Account to fetch (default: the configured account)
    pub account: Option<String>,
    /// Alternative name for `account`
    pub username: Option<String>,
}

impl LatestPostQuery {
    /// Requested account, `account` taking precedence over `username`
    pub fn requested(&self) -> Option<&str> {
        self.account.as_deref().or(self.username.as_deref())
    }
}

/// Request body for POST /summarize
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeRequest {
    /// Text to summarize (required, non-empty)
    pub text: Option<String>,
    /// Maximum summary length in characters, 1-1000 (default: 280)
    pub max_length: Option<i64>,
}

/// Request body for POST /post
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    /// Text to publish (required, at most 280 characters)
    pub text: Option<String>,
    /// Image to attach; blank or placeholder values are ignored
    pub image_url: Option<String>,
}

/// Request body for POST /run-workflow (the whole body is optional)
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRequestBody {
    /// Account to relay (default: the configured account)
    #[serde(alias = "instagramUsername")]
    pub account: Option<String>,
    /// Attach the post's image (default: false)
    pub include_image: Option<bool>,
}

/// Reference to a published post in the workflow response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TweetRef {
    /// Post identifier
    pub id: String,
    /// Public URL
    pub url: String,
}

/// Response payload of POST /run-workflow
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowResponse {
    /// The retrieved post
    pub post: Post,
    /// The published summary
    pub summary: String,
    /// The published post; null when posting was skipped
    pub tweet: Option<TweetRef>,
    /// Why posting was skipped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Response payload of GET /health
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always "ok"
    pub status: String,
    /// Crate version
    pub version: String,
    /// Runtime environment
    pub environment: String,
}
