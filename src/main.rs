//! insta-bridge HTTP server
//!
//! Reads configuration from the environment (and `.env`), then serves the API
//! until SIGINT/SIGTERM.

use insta_bridge::{Bridge, Config, Environment, api, shutdown_signal};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info,insta_bridge=debug";

fn init_tracing(environment: Environment) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    if environment.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(false)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(Environment::default());
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(config.server.environment);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.server.environment,
        "Starting insta-bridge"
    );

    let bridge = match Bridge::from_config(config) {
        Ok(bridge) => bridge,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize services");
            return ExitCode::FAILURE;
        }
    };

    match api::start_api_server(bridge, shutdown_signal()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "API server failed");
            ExitCode::FAILURE
        }
    }
}
