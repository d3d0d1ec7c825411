//! Workflow handler.

use super::{TweetRef, WorkflowRequestBody, WorkflowResponse};
use crate::api::AppState;
use crate::api::error_response::ApiResponse;
use crate::error::{Error, Result};
use crate::workflow::WorkflowRequest;
use axum::{body::Bytes, extract::State};

/// POST /run-workflow - Fetch, summarize and publish in one call
///
/// The body is optional. When posting fails for lack of write permission the
/// response is still 200, with `tweet: null`, a `warning`, and
/// `meta.partialSuccess`/`meta.failedStage` set.
#[utoipa::path(
    post,
    path = "/run-workflow",
    tag = "workflow",
    request_body(content = WorkflowRequestBody, description = "Optional workflow parameters"),
    responses(
        (status = 200, description = "Workflow completed, possibly without posting", body = WorkflowResponse),
        (status = 400, description = "Malformed request body"),
        (status = 500, description = "Workflow failed; error.details.stage names the stage")
    )
)]
pub async fn run_workflow(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<ApiResponse<WorkflowResponse>> {
    let body = parse_body(&body)?;
    let request = WorkflowRequest {
        account: body.account,
        include_image: body.include_image.unwrap_or(false),
    };

    let report = state
        .bridge
        .workflow
        .run(&request)
        .await
        .map_err(|e| state.redact(e))?;

    let failed_stage = report.failed_stage();
    let strategy = report.strategy;
    let response = WorkflowResponse {
        post: report.post,
        summary: report.summary.summary,
        tweet: report.receipt.map(|r| TweetRef {
            id: r.post_id,
            url: r.post_url,
        }),
        warning: report.warning,
    };

    let mut reply = ApiResponse::ok(response).with_meta("strategy", strategy.as_str());
    if let Some(stage) = failed_stage {
        reply = reply
            .with_meta("partialSuccess", true)
            .with_meta("failedStage", stage.as_str());
    }
    Ok(reply)
}

fn parse_body(body: &[u8]) -> Result<WorkflowRequestBody> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(WorkflowRequestBody::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| Error::validation(format!("Invalid request body: {e}")))
}
