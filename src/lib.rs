//! # insta-bridge
//!
//! Relays the latest Instagram post of an account to X.com: the post is
//! retrieved without authentication, its caption is summarized by a language
//! model (or truncated locally), and the summary is published.
//!
//! ## Design
//!
//! - **Never hard-fails on retrieval** - three extraction strategies run in
//!   rounds with a fixed delay, successful results are cached, and canned
//!   content is served when everything fails
//! - **Degrades instead of erroring** - no LLM key means local truncation, no
//!   X.com credentials means a mock publisher
//! - **Narrow seams** - page fetching, identities, caching, summarizing and
//!   publishing are traits, so every layer is testable offline
//!
//! ## Quick Start
//!
//! ```no_run
//! use insta_bridge::{Bridge, Config};
//! use insta_bridge::workflow::WorkflowRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bridge = Bridge::from_config(Config::from_env()?)?;
//!
//!     let report = bridge
//!         .workflow
//!         .run(&WorkflowRequest {
//!             account: Some("natgeo".to_string()),
//!             include_image: false,
//!         })
//!         .await?;
//!
//!     println!("{} -> {:?}", report.summary.summary, report.receipt);
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Service facade
pub mod bridge;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Instagram retrieval
pub mod instagram;
/// Publishing to X.com
pub mod posting;
/// Retry logic with fixed or exponential delays
pub mod retry;
/// Caption summarization
pub mod summarize;
/// Core data types
pub mod types;
/// Utility functions
pub mod utils;
/// Retrieval → summarization → posting
pub mod workflow;

// Re-export commonly used types
pub use bridge::Bridge;
pub use config::{Config, Environment};
pub use error::{ApiError, Error, Result, ToHttpStatus};
pub use instagram::PostRetriever;
pub use posting::{PublishError, Publisher};
pub use summarize::{SummaryService, Summarizer};
pub use types::{Post, PostReceipt, RetrievalResult, StrategyUsed, Summary};
pub use workflow::{Stage, WorkflowReport, WorkflowRequest, WorkflowService};

/// Resolves when the process is asked to stop.
///
/// - **Unix:** SIGTERM or SIGINT. If one handler cannot be registered the
///   other is still honored; if neither can, falls back to `ctrl_c()`.
/// - **Windows/other:** Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// Pass it to [`api::start_api_server`] for graceful shutdown.
pub async fn shutdown_signal() {
    wait_for_signal().await;
    tracing::info!("Shutdown requested, draining in-flight requests");
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Registration can fail in restricted environments (containers, tests)
    match (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
    ) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => tracing::info!("Received SIGTERM signal"),
                _ = sigint.recv() => tracing::info!("Received SIGINT signal (Ctrl+C)"),
            }
        }
        (Ok(mut sigterm), Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            sigterm.recv().await;
            tracing::info!("Received SIGTERM signal");
        }
        (Err(e), Ok(mut sigint)) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            sigint.recv().await;
            tracing::info!("Received SIGINT signal (Ctrl+C)");
        }
        (Err(e), Err(_)) => {
            tracing::error!(error = %e, "Could not register any signal handlers, using ctrl_c fallback");
            tokio::signal::ctrl_c().await.ok();
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl+C signal"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl+C signal"),
    }
}
