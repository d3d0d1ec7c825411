//! Caption summarization
//!
//! [`SummaryService`] asks a language model ([`LlmSummarizer`]) for a summary
//! and falls back to [`truncate_summary`] whenever no model is configured or
//! the model call fails. Summarization therefore never fails.

mod openai;
mod truncate;

pub use openai::{LlmSummarizer, summarize_prompt};
pub use truncate::{clamp_summary, truncate_summary};

use crate::config::SummarizerConfig;
use crate::error::{Error, Result};
use crate::types::Summary;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Failure of a model-backed summarizer
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// Transport failure or undecodable response
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("API returned HTTP {status}: {body}")]
    Api {
        /// Response status code
        status: u16,
        /// Response body, for diagnostics
        body: String,
    },

    /// The API answered without any text
    #[error("no content returned from the model")]
    EmptyCompletion,

    /// The key cannot be sent as a header
    #[error("API key contains invalid characters")]
    InvalidApiKey,
}

impl From<SummarizeError> for Error {
    fn from(error: SummarizeError) -> Self {
        Error::upstream("llm", error.to_string())
    }
}

/// Something that can condense text
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Summarize `text`, aiming for at most `max_length` characters
    async fn summarize(&self, text: &str, max_length: usize) -> std::result::Result<String, SummarizeError>;
}

/// Summarization with graceful degradation
pub struct SummaryService {
    model: Option<Arc<dyn Summarizer>>,
}

impl SummaryService {
    /// Service using `model` when given, local truncation otherwise
    pub fn new(model: Option<Arc<dyn Summarizer>>) -> Self {
        Self { model }
    }

    /// Service backed by the configured model, if an API key is set
    pub fn from_config(config: &SummarizerConfig) -> Result<Self> {
        let model: Option<Arc<dyn Summarizer>> = match &config.api_key {
            Some(key) => Some(Arc::new(LlmSummarizer::new(key, config).map_err(Error::from)?)),
            None => {
                tracing::warn!("No LLM API key configured, summaries use local truncation");
                None
            }
        };
        Ok(Self::new(model))
    }

    /// Whether a language model is configured
    pub fn uses_model(&self) -> bool {
        self.model.is_some()
    }

    /// Summarize `text` to at most `max_length` characters
    pub async fn summarize(&self, text: &str, max_length: usize) -> Summary {
        let Some(model) = &self.model else {
            return Summary::new(text, truncate_summary(text, max_length));
        };

        match model.summarize(text, max_length).await {
            Ok(summary) => {
                let length = summary.chars().count();
                if length > max_length {
                    tracing::warn!(
                        summarizer = model.name(),
                        length,
                        max_length,
                        "Summary exceeds max length, truncating"
                    );
                }
                Summary::new(text, clamp_summary(&summary, max_length))
            }
            Err(e) => {
                tracing::warn!(
                    summarizer = model.name(),
                    error = %e,
                    "Summarization failed, using local truncation"
                );
                Summary::new(text, truncate_summary(text, max_length))
            }
        }
    }
}
