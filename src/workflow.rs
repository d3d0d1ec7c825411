//! Retrieval → summarization → posting
//!
//! [`WorkflowService::run`] chains the three capabilities. Retrieval degrades
//! to canned data and summarization degrades to local truncation, so in
//! practice only posting can fail. A posting failure caused by missing write
//! permission is reported as a partial success ([`WorkflowReport::warning`]);
//! any other posting failure aborts the run with [`Error::Workflow`].

use crate::error::{Error, Result};
use crate::instagram::PostRetriever;
use crate::posting::{PublishError, Publisher};
use crate::summarize::SummaryService;
use crate::types::{Post, PostReceipt, StrategyUsed, Summary};
use crate::utils::sanitize_image_url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use utoipa::ToSchema;

/// Warning attached to a run whose post was skipped for lack of permission
pub const PERMISSION_WARNING: &str =
    "Posting was skipped: the X.com app needs Read and Write permissions";

/// Step of the workflow
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Fetching the latest post
    Retrieval,
    /// Condensing the caption
    Summarization,
    /// Publishing the summary
    Posting,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Retrieval => "retrieval",
            Stage::Summarization => "summarization",
            Stage::Posting => "posting",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of one run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkflowRequest {
    /// Account to relay; the default account when `None`
    pub account: Option<String>,
    /// Attach the post's image (default: false)
    pub include_image: bool,
}

/// Outcome of a completed run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkflowReport {
    /// The retrieved post
    pub post: Post,
    /// Summary of its caption
    pub summary: Summary,
    /// Receipt of the published post; `None` when posting was skipped
    pub receipt: Option<PostReceipt>,
    /// Why posting was skipped, when it was
    pub warning: Option<String>,
    /// How the post was retrieved
    pub strategy: StrategyUsed,
}

impl WorkflowReport {
    /// Stage that did not complete, if any
    pub fn failed_stage(&self) -> Option<Stage> {
        self.receipt.is_none().then_some(Stage::Posting)
    }
}

/// Runs the full relay
pub struct WorkflowService {
    retriever: Arc<PostRetriever>,
    summaries: Arc<SummaryService>,
    publisher: Arc<dyn Publisher>,
    max_length: usize,
}

impl WorkflowService {
    /// `max_length` is the summary budget, normally the post length limit
    pub fn new(
        retriever: Arc<PostRetriever>,
        summaries: Arc<SummaryService>,
        publisher: Arc<dyn Publisher>,
        max_length: usize,
    ) -> Self {
        Self {
            retriever,
            summaries,
            publisher,
            max_length,
        }
    }

    /// Relay the latest post of the requested account
    pub async fn run(&self, request: &WorkflowRequest) -> Result<WorkflowReport> {
        tracing::info!(
            account = ?request.account,
            include_image = request.include_image,
            "Starting workflow"
        );

        let retrieval = self
            .retriever
            .fetch_latest_post(request.account.as_deref())
            .await;
        let strategy = retrieval.strategy_used;
        let post = match (retrieval.ok, retrieval.post) {
            (true, Some(post)) => post,
            _ => {
                return Err(Error::Workflow {
                    stage: Stage::Retrieval,
                    message: retrieval
                        .error
                        .unwrap_or_else(|| "no post retrieved".to_string()),
                });
            }
        };
        tracing::info!(account = %post.account, strategy = %strategy, "Retrieved post");

        let summary = self.summaries.summarize(&post.caption, self.max_length).await;
        tracing::info!(
            caption_chars = post.caption.chars().count(),
            summary_chars = summary.character_count,
            "Summarized caption"
        );

        let image_url = if request.include_image {
            sanitize_image_url(Some(&post.image_url))
        } else {
            None
        };

        match self
            .publisher
            .publish(&summary.summary, image_url.as_deref())
            .await
        {
            Ok(receipt) => {
                tracing::info!(post_id = %receipt.post_id, "Workflow completed");
                Ok(WorkflowReport {
                    post,
                    summary,
                    receipt: Some(receipt),
                    warning: None,
                    strategy,
                })
            }
            Err(PublishError::Permission) => {
                tracing::warn!("Posting failed for lack of write permission, returning partial result");
                Ok(WorkflowReport {
                    post,
                    summary,
                    receipt: None,
                    warning: Some(PERMISSION_WARNING.to_string()),
                    strategy,
                })
            }
            Err(e) => {
                tracing::error!(error = %e, "Posting failed");
                Err(Error::Workflow {
                    stage: Stage::Posting,
                    message: e.to_string(),
                })
            }
        }
    }
}
