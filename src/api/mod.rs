//! REST API server module
//!
//! Exposes the retrieval, summarization, posting and workflow capabilities
//! over HTTP with a uniform JSON envelope and an OpenAPI 3 description.

use crate::{Bridge, Result};
use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod error_response;
pub mod openapi;
pub mod routes;
pub mod state;

pub use error_response::ApiResponse;
pub use openapi::ApiDoc;
pub use state::AppState;

/// Create the API router with all route definitions
///
/// # Routes
///
/// ## Capabilities
/// - `GET /latest-post` - Latest post of an account (`?account=`)
/// - `POST /summarize` - Summarize a text
/// - `POST /post` - Publish a text, optionally with an image
/// - `POST /run-workflow` - Retrieve, summarize and publish
///
/// ## Legacy aliases
/// - `GET /api/instagram/latest` (also accepts `?username=`)
/// - `POST /api/summarize`
/// - `POST /api/tweet`
/// - `POST /api/process-instagram`
///
/// ## System
/// - `GET /` - Service description
/// - `GET /health` - Health check
/// - `GET /openapi.json` - OpenAPI specification
/// - `GET /debug/environment` - Runtime info (bearer token in production)
/// - `GET /swagger-ui` - Interactive Swagger UI documentation (if enabled)
///
/// Any other path answers 404 with the error envelope.
pub fn create_router(bridge: Bridge) -> Router {
    let config = bridge.config.clone();
    let state = AppState::new(bridge);

    let router = Router::new()
        .route("/latest-post", get(routes::latest_post))
        .route("/summarize", post(routes::summarize_text))
        .route("/post", post(routes::publish_post))
        .route("/run-workflow", post(routes::run_workflow))
        // Legacy aliases
        .route("/api/instagram/latest", get(routes::latest_post))
        .route("/api/summarize", post(routes::summarize_text))
        .route("/api/tweet", post(routes::publish_post))
        .route("/api/process-instagram", post(routes::run_workflow))
        // System
        .route("/", get(routes::home))
        .route("/health", get(routes::health_check))
        .route("/openapi.json", get(routes::openapi_spec))
        .route("/debug/environment", get(routes::debug_environment))
        .fallback(routes::not_found);

    // The UI gets its own copy of the document; /openapi.json is already routed
    let router = if config.server.swagger_ui {
        router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
    } else {
        router
    };

    router
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&config.server.cors_origins))
}

/// Build a CORS layer based on configured origins
///
/// `"*"` (or an empty list) allows any origin; otherwise only the listed
/// origins are allowed. All methods and headers are allowed.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_any = origins.iter().any(|o| o == "*");

    if allow_any || origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Start the API server on the configured bind address.
///
/// Runs until the server fails or `shutdown` resolves; in-flight requests
/// are allowed to finish before returning.
///
/// # Example
///
/// ```no_run
/// use insta_bridge::{Bridge, Config};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let bridge = Bridge::from_config(Config::from_env()?)?;
///
/// // Serve until Ctrl-C / SIGTERM
/// insta_bridge::api::start_api_server(bridge, insta_bridge::shutdown_signal()).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_api_server<F>(bridge: Bridge, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let bind_address = bridge.config.server.bind_address;

    tracing::info!(address = %bind_address, "Starting API server");

    let app = create_router(bridge);

    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(crate::error::Error::Io)?;

    tracing::info!(
        address = %listener.local_addr().unwrap_or(bind_address),
        "API server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(crate::error::Error::Io)?;

    tracing::info!("API server stopped");
    Ok(())
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
