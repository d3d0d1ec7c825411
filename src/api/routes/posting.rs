//! Posting handler.

use super::{JsonBody, PostRequest};
use crate::api::AppState;
use crate::api::error_response::{ApiResponse, error_response};
use crate::config::MAX_TWEET_LENGTH;
use crate::error::{ApiError, Error, Result};
use crate::posting::PublishError;
use crate::types::PostReceipt;
use crate::utils::{preview, sanitize_image_url};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Map, json};

/// POST /post - Publish a text, optionally with an image
#[utoipa::path(
    post,
    path = "/post",
    tag = "posting",
    request_body = PostRequest,
    responses(
        (status = 200, description = "Post published", body = PostReceipt),
        (status = 400, description = "Missing text or text longer than 280 characters"),
        (status = 403, description = "The X.com app lacks Read and Write permissions"),
        (status = 500, description = "X.com rejected the post (code POSTING_ERROR)")
    )
)]
pub async fn publish_post(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<PostRequest>,
) -> Result<Response> {
    let text = request
        .text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| Error::validation("Text to post is required"))?;

    let length = text.chars().count();
    if length > MAX_TWEET_LENGTH {
        return Err(Error::validation(format!(
            "Post exceeds maximum length of {MAX_TWEET_LENGTH} characters (got {length})"
        )));
    }

    let image_url = sanitize_image_url(request.image_url.as_deref());
    tracing::info!(
        text = %preview(&text, 30),
        with_image = image_url.is_some(),
        "Processing post request"
    );

    match state
        .bridge
        .publisher
        .publish(&text, image_url.as_deref())
        .await
    {
        Ok(receipt) => Ok(ApiResponse::ok(receipt).into_response()),
        Err(e @ (PublishError::Permission | PublishError::InvalidInput(_))) => Err(e.into()),
        Err(e) => {
            tracing::error!(error = %e, "Posting failed");
            Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details(
                    "POSTING_ERROR",
                    format!("Failed to post: {e}"),
                    json!({ "service": "x.com" }),
                ),
                Map::new(),
            ))
        }
    }
}
