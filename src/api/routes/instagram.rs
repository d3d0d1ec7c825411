//! Latest post retrieval handler.

use super::LatestPostQuery;
use crate::api::AppState;
use crate::api::error_response::ApiResponse;
use crate::error::{Error, Result};
use crate::types::Post;
use axum::extract::{Query, State};

/// GET /latest-post - Fetch the latest post of an account
///
/// Never fails on upstream trouble: when every live strategy fails the
/// canned post for the account is returned with `meta.strategy = "fallback"`.
#[utoipa::path(
    get,
    path = "/latest-post",
    tag = "instagram",
    params(LatestPostQuery),
    responses(
        (status = 200, description = "Latest post; meta.strategy names how it was obtained", body = Post),
        (status = 502, description = "No post could be produced")
    )
)]
pub async fn latest_post(
    State(state): State<AppState>,
    Query(query): Query<LatestPostQuery>,
) -> Result<ApiResponse<Post>> {
    tracing::info!(account = ?query.requested(), "Latest post requested");

    let result = state
        .bridge
        .retriever
        .fetch_latest_post(query.requested())
        .await;

    match (result.ok, result.post) {
        (true, Some(post)) => {
            Ok(ApiResponse::ok(post).with_meta("strategy", result.strategy_used.as_str()))
        }
        _ => Err(Error::upstream(
            "instagram",
            format!(
                "Failed to fetch Instagram post: {}",
                result.error.as_deref().unwrap_or("no post retrieved")
            ),
        )),
    }
}
