//! System handlers: health, home, OpenAPI, debug info, 404.

use super::HealthResponse;
use crate::api::AppState;
use crate::api::error_response::{ApiResponse, error_response};
use crate::error::{ApiError, Error, Result};
use crate::utils::debug_tokens;
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, Uri, header::AUTHORIZATION},
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value, json};

/// GET /health - Health check
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> ApiResponse<HealthResponse> {
    ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.environment().to_string(),
    })
}

/// GET / - Service description and endpoint list
#[utoipa::path(
    get,
    path = "/",
    tag = "system",
    responses(
        (status = 200, description = "Service description")
    )
)]
pub async fn home(State(state): State<AppState>) -> ApiResponse<Value> {
    ApiResponse::ok(json!({
        "name": "Instagram to X.com Bridge API",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.environment().as_str(),
        "description": "Fetches the latest post from Instagram, summarizes its caption with an LLM, and posts the summary to X.com",
        "endpoints": [
            { "method": "GET", "path": "/latest-post", "description": "Latest post of an account (?account=)" },
            { "method": "POST", "path": "/summarize", "description": "Summarize a text ({text, maxLength?})" },
            { "method": "POST", "path": "/post", "description": "Publish a text to X.com ({text, imageUrl?})" },
            { "method": "POST", "path": "/run-workflow", "description": "Fetch, summarize and publish ({account?, includeImage?})" },
            { "method": "GET", "path": "/health", "description": "Health check" },
            { "method": "GET", "path": "/openapi.json", "description": "OpenAPI document" },
        ],
    }))
}

/// GET /openapi.json - OpenAPI specification
#[utoipa::path(
    get,
    path = "/openapi.json",
    tag = "system",
    responses(
        (status = 200, description = "OpenAPI specification in JSON format")
    )
)]
pub async fn openapi_spec() -> impl IntoResponse {
    use crate::api::openapi::ApiDoc;
    use utoipa::OpenApi;

    Json(ApiDoc::openapi())
}

/// GET /debug/environment - Runtime information
///
/// Open in development. In production the request needs
/// `Authorization: Bearer debug-<hours since epoch>` for the current or the
/// previous hour.
#[utoipa::path(
    get,
    path = "/debug/environment",
    tag = "system",
    responses(
        (status = 200, description = "Runtime information"),
        (status = 401, description = "Missing or invalid debug token")
    ),
    security(
        ("debug_token" = [])
    )
)]
pub async fn debug_environment(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<ApiResponse<Value>> {
    if state.environment().is_production() {
        let token = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| Error::Unauthorized("Not authorized".to_string()))?;

        if !debug_tokens(chrono::Utc::now()).iter().any(|t| t == token) {
            tracing::warn!("Rejected debug request with invalid token");
            return Err(Error::Unauthorized("Invalid debug token".to_string()));
        }
    }

    let bridge = &state.bridge;
    Ok(ApiResponse::ok(json!({
        "environment": state.environment().as_str(),
        "version": env!("CARGO_PKG_VERSION"),
        "os": std::env::consts::OS,
        "arch": std::env::consts::ARCH,
        "pid": std::process::id(),
        "serverTimestamp": crate::types::now_rfc3339(),
        "uptimeSecs": state.started_at.elapsed().as_secs(),
        "defaultAccount": bridge.retriever.default_account(),
        "cacheEnabled": bridge.retriever.cache_enabled(),
        "llmConfigured": bridge.summaries.uses_model(),
        "livePosting": bridge.publisher.is_live(),
    })))
}

/// Fallback for unknown routes
pub async fn not_found(uri: Uri) -> Response {
    let mut meta = Map::new();
    meta.insert("path".to_string(), Value::String(uri.path().to_string()));
    error_response(
        StatusCode::NOT_FOUND,
        ApiError::new("NOT_FOUND", "Resource not found"),
        meta,
    )
}
