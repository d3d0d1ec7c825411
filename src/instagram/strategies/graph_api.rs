use super::{Strategy, StrategyContext, StrategyError};
use crate::instagram::identity::HeaderPreset;
use crate::types::{Post, StrategyUsed};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;

const NO_POSTS: &str = "No posts found in GraphQL response";

/// Reads the newest timeline entry from the web profile API
pub struct GraphApiStrategy {
    context: Arc<StrategyContext>,
}

impl GraphApiStrategy {
    pub fn new(context: Arc<StrategyContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Strategy for GraphApiStrategy {
    fn tag(&self) -> StrategyUsed {
        StrategyUsed::GraphApi
    }

    async fn fetch(&self, account: &str) -> Result<Post, StrategyError> {
        let url = format!(
            "{}/api/v1/users/web_profile_info/?username={}",
            self.context.base_url(),
            urlencoding::encode(account)
        );
        let body = self
            .context
            .get(&url, HeaderPreset::ProfileApi, account)
            .await?;

        parse_profile_response(&body, account, self.context.base_url())
    }
}

/// Extract the newest post from a web profile API response body
///
/// The post time comes from `taken_at_timestamp` when it is present and valid.
pub fn parse_profile_response(
    body: &str,
    account: &str,
    base_url: &str,
) -> Result<Post, StrategyError> {
    let json: Value = serde_json::from_str(body)?;

    let node = json
        .pointer("/data/user/edge_owner_to_timeline_media/edges/0/node")
        .ok_or(StrategyError::NoData(NO_POSTS))?;

    let image_url = node
        .get("display_url")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or(StrategyError::NoData(NO_POSTS))?;

    let caption = node
        .pointer("/edge_media_to_caption/edges/0/node/text")
        .and_then(Value::as_str)
        .unwrap_or_default();

    let post_url = match node.get("shortcode").and_then(Value::as_str) {
        Some(shortcode) if !shortcode.is_empty() => format!("{base_url}/p/{shortcode}/"),
        _ => format!("{base_url}/{account}/"),
    };

    let post = Post::new(account, caption, image_url, post_url);

    let taken_at = node
        .get("taken_at_timestamp")
        .and_then(Value::as_i64)
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));

    Ok(match taken_at {
        Some(at) => post.with_timestamp(at),
        None => post,
    })
}
