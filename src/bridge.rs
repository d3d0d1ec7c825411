//! The service facade shared by the HTTP layer

use crate::config::Config;
use crate::error::Result;
use crate::instagram::PostRetriever;
use crate::posting::{Publisher, publisher_from_config};
use crate::summarize::SummaryService;
use crate::workflow::WorkflowService;
use std::sync::Arc;

/// One instance of every capability, built from a [`Config`]
///
/// Cloning is cheap; all members are reference counted.
#[derive(Clone)]
pub struct Bridge {
    /// Configuration the bridge was built from
    pub config: Arc<Config>,
    /// Latest-post retrieval
    pub retriever: Arc<PostRetriever>,
    /// Caption summarization
    pub summaries: Arc<SummaryService>,
    /// Posting to X.com
    pub publisher: Arc<dyn Publisher>,
    /// The full relay
    pub workflow: Arc<WorkflowService>,
}

impl Bridge {
    /// Build every capability from configuration
    ///
    /// Missing LLM or X.com credentials are not an error: the local
    /// summarizer and the mock publisher are used instead.
    pub fn from_config(config: Config) -> Result<Self> {
        config.validate()?;

        let retriever = Arc::new(PostRetriever::from_config(&config.instagram)?);
        let summaries = Arc::new(SummaryService::from_config(&config.summarizer)?);
        let publisher = publisher_from_config(&config.posting)?;

        tracing::info!(
            environment = %config.server.environment,
            default_account = %retriever.default_account(),
            cache_enabled = retriever.cache_enabled(),
            llm = summaries.uses_model(),
            live_posting = publisher.is_live(),
            "Bridge initialized"
        );

        Ok(Self::new(config, retriever, summaries, publisher))
    }

    /// Assemble a bridge from prebuilt parts
    pub fn new(
        config: Config,
        retriever: Arc<PostRetriever>,
        summaries: Arc<SummaryService>,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        let workflow = Arc::new(WorkflowService::new(
            retriever.clone(),
            summaries.clone(),
            publisher.clone(),
            config.summarizer.max_length,
        ));

        Self {
            config: Arc::new(config),
            retriever,
            summaries,
            publisher,
            workflow,
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_builds_offline_bridge() {
        let bridge = Bridge::from_config(Config::default()).unwrap();

        assert_eq!(bridge.retriever.default_account(), "bbcnews");
        assert!(!bridge.summaries.uses_model());
        assert!(!bridge.publisher.is_live());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = Config::default();
        config.instagram.max_retries = 0;
        assert!(Bridge::from_config(config).is_err());
    }
}
