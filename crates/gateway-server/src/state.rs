//! Shared application state.

use gateway_core::DEFAULT_MAX_BODY_BYTES;
use gateway_providers::ChatGateway;
use std::sync::Arc;

/// State handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    /// The request gateway
    pub gateway: Arc<ChatGateway>,
    /// Forward raw provider error bodies to callers
    pub expose_provider_details: bool,
    /// Maximum request body size in bytes
    pub max_body_bytes: usize,
}

impl AppState {
    /// Create state around a gateway
    #[must_use]
    pub fn new(gateway: ChatGateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
            expose_provider_details: false,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Set whether raw provider error bodies are returned
    #[must_use]
    pub fn with_expose_provider_details(mut self, expose: bool) -> Self {
        self.expose_provider_details = expose;
        self
    }

    /// Set the request body limit
    #[must_use]
    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }
}
