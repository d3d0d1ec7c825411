//! OpenAPI documentation and schema generation
//!
//! This module defines the OpenAPI specification for the insta-bridge REST API
//! using utoipa for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the insta-bridge REST API
///
/// The spec can be accessed via:
/// - `/openapi.json` - JSON format OpenAPI specification
/// - `/swagger-ui` - Interactive Swagger UI documentation
///
/// Every response body is wrapped in the `{success, data | error, meta}`
/// envelope; the schemas below describe the `data` part.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "insta-bridge REST API",
        version = "0.1.0",
        description = "Fetch the latest Instagram post of an account, summarize its caption with an LLM, and publish the summary to X.com",
        contact(
            name = "insta-bridge",
            url = "https://github.com/insta-bridge/insta-bridge"
        ),
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        crate::api::routes::latest_post,
        crate::api::routes::summarize_text,
        crate::api::routes::publish_post,
        crate::api::routes::run_workflow,

        // System
        crate::api::routes::health_check,
        crate::api::routes::home,
        crate::api::routes::openapi_spec,
        crate::api::routes::debug_environment,
    ),
    components(schemas(
        // Core types from types.rs
        crate::types::Post,
        crate::types::StrategyUsed,
        crate::types::RetrievalResult,
        crate::types::Summary,
        crate::types::PostReceipt,
        crate::workflow::Stage,
        crate::config::Environment,

        // API request/response types from routes
        crate::api::routes::LatestPostQuery,
        crate::api::routes::SummarizeRequest,
        crate::api::routes::PostRequest,
        crate::api::routes::WorkflowRequestBody,
        crate::api::routes::WorkflowResponse,
        crate::api::routes::TweetRef,
        crate::api::routes::HealthResponse,

        // Error types from error.rs
        crate::error::ApiError,
    )),
    tags(
        (name = "instagram", description = "Retrieval - Latest post of an Instagram account"),
        (name = "summarize", description = "Summarization - Condense a text with the LLM or local truncation"),
        (name = "posting", description = "Posting - Publish a text to X.com"),
        (name = "workflow", description = "Workflow - Retrieve, summarize and publish in one call"),
        (name = "system", description = "System endpoints - Health check, OpenAPI spec, debug info"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Security addon describing the bearer token of the debug endpoint
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = &mut openapi.components {
            components.add_security_scheme(
                "debug_token",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            );
        }
    }
}
