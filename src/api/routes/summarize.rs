//! Summarization handler.

use super::{JsonBody, SummarizeRequest};
use crate::api::AppState;
use crate::api::error_response::ApiResponse;
use crate::config::MAX_TWEET_LENGTH;
use crate::error::{Error, Result};
use crate::types::Summary;
use axum::extract::State;

/// Accepted range of `maxLength`
pub const MAX_LENGTH_RANGE: (i64, i64) = (1, 1000);

/// POST /summarize - Summarize a text
///
/// Uses the language model when one is configured and local sentence-aware
/// truncation otherwise (or when the model call fails).
#[utoipa::path(
    post,
    path = "/summarize",
    tag = "summarize",
    request_body = SummarizeRequest,
    responses(
        (status = 200, description = "Summary of the text", body = Summary),
        (status = 400, description = "Missing text or maxLength out of range")
    )
)]
pub async fn summarize_text(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SummarizeRequest>,
) -> Result<ApiResponse<Summary>> {
    let text = request
        .text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| Error::validation("Text to summarize is required"))?;

    let max_length = validate_max_length(request.max_length)?;

    tracing::info!(
        chars = text.chars().count(),
        max_length,
        "Processing summarization request"
    );

    let summary = state.bridge.summaries.summarize(&text, max_length).await;
    Ok(ApiResponse::ok(summary))
}

fn validate_max_length(max_length: Option<i64>) -> Result<usize> {
    let (min, max) = MAX_LENGTH_RANGE;
    match max_length {
        None => Ok(MAX_TWEET_LENGTH),
        Some(n) if (min..=max).contains(&n) => Ok(n as usize),
        Some(n) => Err(Error::validation(format!(
            "maxLength must be between {min} and {max}, got {n}"
        ))),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_length_bounds() {
        assert_eq!(validate_max_length(None).unwrap(), 280);
        assert_eq!(validate_max_length(Some(1)).unwrap(), 1);
        assert_eq!(validate_max_length(Some(1000)).unwrap(), 1000);
        assert!(validate_max_length(Some(0)).is_err());
        assert!(validate_max_length(Some(1001)).is_err());
        assert!(validate_max_length(Some(-5)).is_err());
    }
}
