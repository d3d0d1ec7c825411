//! Latest-post retrieval from Instagram
//!
//! [`PostRetriever`] ties the pieces together:
//!
//! 1. a fresh [`PostCache`] entry is returned as-is (tagged `cache`)
//! 2. otherwise the strategies run in priority order, in rounds, through
//!    [`with_retry`](crate::retry::with_retry) with a fixed pause between rounds
//! 3. when every round fails the canned [`fallback_post`] is returned
//!
//! Retrieval therefore never fails from the caller's point of view.

pub mod cache;
pub mod fallback;
pub mod fetcher;
pub mod identity;
pub mod strategies;

pub use cache::{CacheEntry, Clock, ManualClock, MemoryCache, PostCache, SystemClock};
pub use fallback::fallback_post;
pub use fetcher::{FetchError, HttpFetcher, PageFetcher};
pub use identity::{FixedIdentity, HeaderPreset, IdentitySource, RandomIdentity, USER_AGENTS};
pub use strategies::{Strategy, StrategyContext, StrategyError, default_strategies};

use crate::config::InstagramConfig;
use crate::error::{Error, Result};
use crate::retry::{IsRetryable, RetryConfig, with_retry};
use crate::types::{Post, RetrievalResult, StrategyUsed};
use std::fmt;
use std::sync::Arc;

/// Every strategy failed during one round
#[derive(Debug)]
struct RoundFailure(Vec<(StrategyUsed, String)>);

impl fmt::Display for RoundFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(tag, error)| format!("{tag}: {error}"))
            .collect();
        write!(f, "all strategies failed ({})", parts.join("; "))
    }
}

impl IsRetryable for RoundFailure {
    fn is_retryable(&self) -> bool {
        true
    }
}

/// Retrieves the latest post of an account
pub struct PostRetriever {
    strategies: Vec<Arc<dyn Strategy>>,
    cache: Option<Arc<dyn PostCache>>,
    rounds: RetryConfig,
    default_account: String,
}

impl PostRetriever {
    /// Assemble a retriever from explicit parts
    ///
    /// `strategies` run in the given order. `rounds.max_attempts` is the number
    /// of rounds.
    pub fn new(
        strategies: Vec<Arc<dyn Strategy>>,
        cache: Option<Arc<dyn PostCache>>,
        rounds: RetryConfig,
        default_account: impl Into<String>,
    ) -> Self {
        Self {
            strategies,
            cache,
            rounds,
            default_account: default_account.into(),
        }
    }

    /// Build the production retriever: HTTP fetcher, random identities, the
    /// three live strategies and (when enabled) an in-memory cache
    pub fn from_config(config: &InstagramConfig) -> Result<Self> {
        let fetcher =
            HttpFetcher::new(config.request_timeout).map_err(|e| Error::Internal(e.to_string()))?;
        let context = Arc::new(StrategyContext::new(
            Arc::new(fetcher),
            Arc::new(RandomIdentity),
            config.base_url.clone(),
        ));

        let cache: Option<Arc<dyn PostCache>> = if config.cache_enabled {
            Some(Arc::new(MemoryCache::new(config.cache_ttl)))
        } else {
            None
        };

        Ok(Self::new(
            default_strategies(context),
            cache,
            RetryConfig::fixed(config.max_retries, config.retry_delay),
            config.default_account.clone(),
        ))
    }

    /// Account used when a request does not name one
    pub fn default_account(&self) -> &str {
        &self.default_account
    }

    /// Whether successful retrievals are cached
    pub fn cache_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// Resolve the account a request refers to
    ///
    /// `None` and blank strings mean the default account; anything else is trimmed.
    pub fn resolve_account(&self, account: Option<&str>) -> String {
        match account.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.default_account.clone(),
        }
    }

    /// Latest post of `account` (or of the default account)
    ///
    /// Always returns a successful result: when no strategy succeeds the
    /// canned post for the account is returned, tagged `fallback`.
    pub async fn fetch_latest_post(&self, account: Option<&str>) -> RetrievalResult {
        let account = self.resolve_account(account);

        if let Some(cache) = &self.cache {
            if let Some(post) = cache.get(&account).await {
                tracing::info!(account = %account, "Serving latest post from cache");
                let post = Post {
                    account: account.clone(),
                    ..post
                };
                return RetrievalResult::success(post, StrategyUsed::Cache);
            }
        }

        let outcome = with_retry(&self.rounds, |attempt| {
            let account = account.as_str();
            async move { self.run_round(account, attempt).await }
        })
        .await;

        match outcome {
            Ok((post, tag)) => {
                if let Some(cache) = &self.cache {
                    cache.put(&account, post.clone()).await;
                }
                RetrievalResult::success(post, tag)
            }
            Err(failure) => {
                tracing::warn!(
                    account = %account,
                    rounds = self.rounds.max_attempts,
                    error = %failure,
                    "All retrieval strategies failed, using fallback data"
                );
                RetrievalResult::success(fallback_post(&account), StrategyUsed::Fallback)
            }
        }
    }

    async fn run_round(
        &self,
        account: &str,
        attempt: u32,
    ) -> std::result::Result<(Post, StrategyUsed), RoundFailure> {
        tracing::debug!(
            account = %account,
            attempt,
            max_attempts = self.rounds.max_attempts,
            "Fetching latest post"
        );

        let mut failures = Vec::with_capacity(self.strategies.len());
        for strategy in &self.strategies {
            let tag = strategy.tag();
            match strategy.fetch(account).await {
                Ok(post) => {
                    tracing::info!(account = %account, strategy = %tag, attempt, "Retrieved latest post");
                    return Ok((post, tag));
                }
                Err(e) => {
                    tracing::warn!(account = %account, strategy = %tag, attempt, error = %e, "Strategy failed");
                    failures.push((tag, e.to_string()));
                }
            }
        }

        Err(RoundFailure(failures))
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    /// Strategy that fails a set number of times before succeeding
    struct ScriptedStrategy {
        tag: StrategyUsed,
        failures_before_success: Option<u32>,
        calls: AtomicU32,
    }

    impl ScriptedStrategy {
        fn failing(tag: StrategyUsed) -> Arc<Self> {
            Arc::new(Self {
                tag,
                failures_before_success: None,
                calls: AtomicU32::new(0),
            })
        }

        fn succeeding_after(tag: StrategyUsed, failures: u32) -> Arc<Self> {
            Arc::new(Self {
                tag,
                failures_before_success: Some(failures),
                calls: AtomicU32::new(0),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Strategy for ScriptedStrategy {
        fn tag(&self) -> StrategyUsed {
            self.tag
        }

        async fn fetch(&self, account: &str) -> std::result::Result<Post, StrategyError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            match self.failures_before_success {
                Some(n) if call >= n => Ok(Post::new(
                    account,
                    format!("live caption from {}", self.tag),
                    "https://cdninstagram.com/live.jpg",
                    "https://www.instagram.com/p/live/",
                )),
                _ => Err(StrategyError::NoData("scripted failure")),
            }
        }
    }

    fn retriever(
        strategies: Vec<Arc<dyn Strategy>>,
        cache: Option<Arc<dyn PostCache>>,
        rounds: u32,
    ) -> PostRetriever {
        PostRetriever::new(
            strategies,
            cache,
            RetryConfig::fixed(rounds, Duration::from_millis(1500)),
            "bbcnews",
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_strategies_failing_yields_fallback_success() {
        let a = ScriptedStrategy::failing(StrategyUsed::GraphApi);
        let b = ScriptedStrategy::failing(StrategyUsed::OpenGraph);
        let c = ScriptedStrategy::failing(StrategyUsed::Markup);
        let retriever = retriever(vec![a.clone(), b.clone(), c.clone()], None, 3);

        let start = tokio::time::Instant::now();
        let result = retriever.fetch_latest_post(Some("some_bakery")).await;

        assert!(result.ok);
        assert_eq!(result.strategy_used, StrategyUsed::Fallback);
        let post = result.post.unwrap();
        assert_eq!(post.account, "some_bakery");
        assert!(post.caption.starts_with("This is a fallback post"));

        // Exactly three rounds of A, B, C with two pauses in between
        assert_eq!((a.calls(), b.calls(), c.calls()), (3, 3, 3));
        assert_eq!(start.elapsed(), Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_round_has_no_pause() {
        let a = ScriptedStrategy::failing(StrategyUsed::GraphApi);
        let retriever = retriever(vec![a.clone()], None, 1);

        let start = tokio::time::Instant::now();
        let result = retriever.fetch_latest_post(None).await;

        assert_eq!(result.strategy_used, StrategyUsed::Fallback);
        assert_eq!(a.calls(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_first_successful_strategy_wins() {
        let a = ScriptedStrategy::failing(StrategyUsed::GraphApi);
        let b = ScriptedStrategy::succeeding_after(StrategyUsed::OpenGraph, 0);
        let c = ScriptedStrategy::succeeding_after(StrategyUsed::Markup, 0);
        let retriever = retriever(vec![a.clone(), b.clone(), c.clone()], None, 3);

        let result = retriever.fetch_latest_post(Some("cnn")).await;

        assert_eq!(result.strategy_used, StrategyUsed::OpenGraph);
        assert_eq!(result.post.unwrap().caption, "live caption from open_graph");
        assert_eq!(c.calls(), 0, "later strategies are not consulted");
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_in_later_round() {
        let a = ScriptedStrategy::succeeding_after(StrategyUsed::GraphApi, 2);
        let b = ScriptedStrategy::failing(StrategyUsed::OpenGraph);
        let retriever = retriever(vec![a.clone(), b.clone()], None, 3);

        let result = retriever.fetch_latest_post(Some("cnn")).await;

        assert_eq!(result.strategy_used, StrategyUsed::GraphApi);
        assert_eq!(a.calls(), 3);
        assert_eq!(b.calls(), 2);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_strategies() {
        let cache: Arc<dyn PostCache> = Arc::new(MemoryCache::new(Duration::from_secs(60)));
        cache
            .put("natgeo", Post::new("natgeo", "cached", "https://img", "https://ig"))
            .await;

        let a = ScriptedStrategy::succeeding_after(StrategyUsed::GraphApi, 0);
        let retriever = retriever(vec![a.clone()], Some(cache), 3);

        let result = retriever.fetch_latest_post(Some("NatGeo")).await;

        assert_eq!(result.strategy_used, StrategyUsed::Cache);
        let post = result.post.unwrap();
        assert_eq!(post.caption, "cached");
        assert_eq!(post.account, "NatGeo");
        assert_eq!(a.calls(), 0);
    }

    #[tokio::test]
    async fn test_live_success_populates_cache() {
        let cache: Arc<dyn PostCache> = Arc::new(MemoryCache::new(Duration::from_secs(60)));
        let a = ScriptedStrategy::succeeding_after(StrategyUsed::GraphApi, 0);
        let retriever = retriever(vec![a.clone()], Some(cache.clone()), 3);

        let first = retriever.fetch_latest_post(Some("cnn")).await;
        let second = retriever.fetch_latest_post(Some("cnn")).await;

        assert_eq!(first.strategy_used, StrategyUsed::GraphApi);
        assert_eq!(second.strategy_used, StrategyUsed::Cache);
        assert_eq!(a.calls(), 1);
    }

    #[tokio::test]
    async fn test_expired_cache_entry_runs_strategies_again() {
        let clock = ManualClock::new();
        let cache: Arc<dyn PostCache> = Arc::new(MemoryCache::with_clock(
            Duration::from_secs(60),
            Arc::new(clock.clone()),
        ));
        let a = ScriptedStrategy::succeeding_after(StrategyUsed::GraphApi, 0);
        let retriever = retriever(vec![a.clone()], Some(cache), 3);

        retriever.fetch_latest_post(Some("cnn")).await;
        clock.advance(Duration::from_secs(61));
        let result = retriever.fetch_latest_post(Some("cnn")).await;

        assert_eq!(result.strategy_used, StrategyUsed::GraphApi);
        assert_eq!(a.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_is_not_cached() {
        let cache: Arc<dyn PostCache> = Arc::new(MemoryCache::new(Duration::from_secs(60)));
        let a = ScriptedStrategy::failing(StrategyUsed::GraphApi);
        let retriever = retriever(vec![a], Some(cache.clone()), 1);

        retriever.fetch_latest_post(Some("cnn")).await;
        assert!(cache.get("cnn").await.is_none());
    }

    #[test]
    fn test_account_resolution() {
        let retriever = retriever(Vec::new(), None, 1);

        assert_eq!(retriever.resolve_account(None), "bbcnews");
        assert_eq!(retriever.resolve_account(Some("   ")), "bbcnews");
        assert_eq!(retriever.resolve_account(Some(" natgeo ")), "natgeo");
    }
}
