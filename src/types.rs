//! Core data types shared by the retrieval, summarization, posting and API layers

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// One retrieved social post
///
/// Built once by whichever strategy succeeds (or by the fallback provider) and
/// never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Caption text (may be empty)
    pub caption: String,

    /// Absolute URL of the primary media (may be empty or invalid)
    pub image_url: String,

    /// Permalink of the post, or the profile URL when no permalink is known
    pub post_url: String,

    /// RFC 3339 timestamp, normally the moment the post was retrieved
    pub timestamp: String,

    /// The account the post was requested for
    pub account: String,
}

impl Post {
    /// Build a post stamped with the current time
    pub fn new(
        account: impl Into<String>,
        caption: impl Into<String>,
        image_url: impl Into<String>,
        post_url: impl Into<String>,
    ) -> Self {
        Self {
            caption: caption.into(),
            image_url: image_url.into(),
            post_url: post_url.into(),
            timestamp: now_rfc3339(),
            account: account.into(),
        }
    }

    /// Replace the timestamp with the given instant
    pub fn with_timestamp(mut self, at: DateTime<Utc>) -> Self {
        self.timestamp = at.to_rfc3339_opts(SecondsFormat::Millis, true);
        self
    }
}

/// Current time as an RFC 3339 string with millisecond precision
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Which method produced a retrieval result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StrategyUsed {
    /// Structured call to the web profile API
    GraphApi,
    /// Open Graph metadata on the profile page
    OpenGraph,
    /// Heuristic scan of the profile page markup
    Markup,
    /// Served from the in-memory response cache
    Cache,
    /// Canned data after every live attempt failed
    Fallback,
}

impl StrategyUsed {
    /// Whether the result came from a live request to the source site
    pub fn is_live(&self) -> bool {
        matches!(
            self,
            StrategyUsed::GraphApi | StrategyUsed::OpenGraph | StrategyUsed::Markup
        )
    }

    /// Tag as it appears in JSON and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyUsed::GraphApi => "graph_api",
            StrategyUsed::OpenGraph => "open_graph",
            StrategyUsed::Markup => "markup",
            StrategyUsed::Cache => "cache",
            StrategyUsed::Fallback => "fallback",
        }
    }
}

impl fmt::Display for StrategyUsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one retrieval
///
/// `post` is present exactly when `ok` is true and `error` exactly when it is
/// false. Fallback data counts as success.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalResult {
    /// Whether a post is available
    pub ok: bool,

    /// The post, when `ok`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Post>,

    /// Failure description, when not `ok`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Method that produced the result
    pub strategy_used: StrategyUsed,
}

impl RetrievalResult {
    /// Successful result carrying a post
    pub fn success(post: Post, strategy_used: StrategyUsed) -> Self {
        Self {
            ok: true,
            post: Some(post),
            error: None,
            strategy_used,
        }
    }

    /// Failed result carrying an error message
    pub fn failure(error: impl Into<String>, strategy_used: StrategyUsed) -> Self {
        Self {
            ok: false,
            post: None,
            error: Some(error.into()),
            strategy_used,
        }
    }
}

/// Result of summarizing a text
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// The text that was summarized
    pub original_text: String,

    /// The summary
    pub summary: String,

    /// Number of characters in `summary`
    pub character_count: usize,
}

impl Summary {
    /// Build a summary, counting characters rather than bytes
    pub fn new(original_text: impl Into<String>, summary: impl Into<String>) -> Self {
        let summary = summary.into();
        Self {
            original_text: original_text.into(),
            character_count: summary.chars().count(),
            summary,
        }
    }
}

/// Identifier of a published post
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostReceipt {
    /// Identifier assigned by the posting service
    pub post_id: String,

    /// Public URL of the published post
    pub post_url: String,
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_post_serializes_in_camel_case() {
        let post = Post::new("natgeo", "Snow leopard", "https://img/1.jpg", "https://ig/p/1/");
        let json = serde_json::to_value(&post).unwrap();

        assert_eq!(json["imageUrl"], "https://img/1.jpg");
        assert_eq!(json["postUrl"], "https://ig/p/1/");
        assert_eq!(json["account"], "natgeo");
        assert!(DateTime::parse_from_rfc3339(json["timestamp"].as_str().unwrap()).is_ok());
    }

    #[test]
    fn test_with_timestamp_uses_given_instant() {
        let at = Utc.with_ymd_and_hms(2024, 4, 1, 12, 0, 0).unwrap();
        let post = Post::new("cnn", "", "", "").with_timestamp(at);
        assert_eq!(post.timestamp, "2024-04-01T12:00:00.000Z");
    }

    #[test]
    fn test_strategy_tags() {
        assert_eq!(
            serde_json::to_value(StrategyUsed::GraphApi).unwrap(),
            "graph_api"
        );
        assert_eq!(StrategyUsed::Fallback.to_string(), "fallback");
        assert!(StrategyUsed::Markup.is_live());
        assert!(!StrategyUsed::Cache.is_live());
        assert!(!StrategyUsed::Fallback.is_live());
    }

    #[test]
    fn test_retrieval_result_constructors_keep_invariant() {
        let ok = RetrievalResult::success(Post::new("a", "b", "c", "d"), StrategyUsed::Cache);
        assert!(ok.ok && ok.post.is_some() && ok.error.is_none());

        let failed = RetrievalResult::failure("nope", StrategyUsed::GraphApi);
        assert!(!failed.ok && failed.post.is_none() && failed.error.is_some());
    }

    #[test]
    fn test_summary_counts_characters_not_bytes() {
        let summary = Summary::new("Café crème", "Café…");
        assert_eq!(summary.character_count, 5);
    }
}
