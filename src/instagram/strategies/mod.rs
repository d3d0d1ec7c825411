//! Extraction strategies
//!
//! Each strategy turns one request against the Instagram website into a
//! [`Post`]. They share a [`StrategyContext`] (fetcher, identity source, base
//! URL) and fail independently with a [`StrategyError`]:
//!
//! - [`GraphApiStrategy`]: JSON from the web profile API
//! - [`OpenGraphStrategy`]: `og:*` meta tags on the profile page
//! - [`MarkupStrategy`]: heuristics over the raw profile page markup

mod graph_api;
mod markup;
mod open_graph;

pub use graph_api::{GraphApiStrategy, parse_profile_response};
pub use markup::{MarkupStrategy, parse_markup};
pub use open_graph::{OpenGraphStrategy, parse_open_graph};

use super::fetcher::{FetchError, PageFetcher};
use super::identity::{HeaderPreset, IdentitySource};
use crate::retry::IsRetryable;
use crate::types::{Post, StrategyUsed};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Why a single strategy produced no post
#[derive(Debug, Error)]
pub enum StrategyError {
    /// The page could not be fetched
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The response was not valid JSON
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// The response did not contain the expected data
    #[error("{0}")]
    NoData(&'static str),

    /// A CSS selector failed to compile
    #[error("invalid selector {0}")]
    Selector(&'static str),
}

impl IsRetryable for StrategyError {
    fn is_retryable(&self) -> bool {
        // The next round may succeed where this one did not
        true
    }
}

/// One method of obtaining the latest post of an account
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Tag attached to results produced by this strategy
    fn tag(&self) -> StrategyUsed;

    /// Retrieve the latest post of `account`
    async fn fetch(&self, account: &str) -> Result<Post, StrategyError>;
}

/// Capabilities shared by all strategies
pub struct StrategyContext {
    fetcher: Arc<dyn PageFetcher>,
    identity: Arc<dyn IdentitySource>,
    base_url: String,
}

impl StrategyContext {
    /// Bundle a fetcher, an identity source and the site origin
    ///
    /// A trailing slash on `base_url` is ignored.
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        identity: Arc<dyn IdentitySource>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            fetcher,
            identity,
            base_url,
        }
    }

    /// Site origin without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Profile page of `account`
    pub fn profile_url(&self, account: &str) -> String {
        format!("{}/{}/", self.base_url, urlencoding::encode(account))
    }

    /// Fetch `url` dressed as the given kind of browser request
    pub async fn get(
        &self,
        url: &str,
        preset: HeaderPreset,
        account: &str,
    ) -> Result<String, StrategyError> {
        let headers = preset.headers(self.identity.user_agent(), &self.base_url, account);
        Ok(self.fetcher.fetch(url, &headers).await?)
    }
}

/// Compile a CSS selector
pub(crate) fn selector(css: &'static str) -> Result<scraper::Selector, StrategyError> {
    scraper::Selector::parse(css).map_err(|_| StrategyError::Selector(css))
}

/// The three live strategies in priority order
pub fn default_strategies(context: Arc<StrategyContext>) -> Vec<Arc<dyn Strategy>> {
    vec![
        Arc::new(GraphApiStrategy::new(context.clone())),
        Arc::new(OpenGraphStrategy::new(context.clone())),
        Arc::new(MarkupStrategy::new(context)),
    ]
}


#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_profile_url_trims_trailing_slash() {
        let context = StrategyContext::new(
            Arc::new(FixtureFetcher::default()),
            Arc::new(crate::instagram::identity::FixedIdentity(0)),
            "http://localhost:8080/",
        );
        assert_eq!(context.profile_url("natgeo"), "http://localhost:8080/natgeo/");
    }

    #[test]
    fn test_default_strategy_order() {
        let (context, _) = context(FixtureFetcher::default());
        let tags: Vec<_> = default_strategies(context).iter().map(|s| s.tag()).collect();
        assert_eq!(
            tags,
            vec![
                StrategyUsed::GraphApi,
                StrategyUsed::OpenGraph,
                StrategyUsed::Markup
            ]
        );
    }

    #[test]
    fn test_strategy_errors_are_retryable() {
        assert!(StrategyError::NoData("nothing").is_retryable());
    }
}
