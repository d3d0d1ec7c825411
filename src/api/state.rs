//! Application state for the API server

use crate::bridge::Bridge;
use crate::config::{Config, Environment};
use crate::error::Error;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state accessible to all route handlers
///
/// This struct is cloned for each request (cheap Arc clone) and provides
/// access to the bridge services and configuration.
#[derive(Clone)]
pub struct AppState {
    /// Retrieval, summarization, posting and workflow services
    pub bridge: Bridge,

    /// When the server state was created, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Create a new AppState
    pub fn new(bridge: Bridge) -> Self {
        Self {
            bridge,
            started_at: Instant::now(),
        }
    }

    /// Configuration the bridge was built from
    pub fn config(&self) -> &Arc<Config> {
        &self.bridge.config
    }

    /// Runtime environment
    pub fn environment(&self) -> Environment {
        self.bridge.config.server.environment
    }

    /// Hide internal error details unless running in development
    pub fn redact(&self, error: Error) -> Error {
        error.redacted(!self.environment().exposes_internal_errors())
    }
}
