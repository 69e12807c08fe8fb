//! Error taxonomy for the chat gateway.
//!
//! Every failure path of a chat request ends in exactly one [`GatewayError`].
//! The variants split into caller mistakes (4xx) and server-side or upstream
//! failures (5xx). Only [`GatewayError::error_message`] is meant for end users;
//! [`GatewayError::provider_detail`] carries raw upstream payloads for operators.

use crate::provider::ProviderKind;
use serde_json::Value;
use thiserror::Error;

/// Result alias used throughout the gateway crates
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Generic message returned to callers when a provider is not configured.
pub const NOT_CONFIGURED_MESSAGE: &str = "AI provider is not configured.";

/// Generic message returned to callers when an upstream body could not be decoded.
pub const MALFORMED_RESPONSE_MESSAGE: &str = "Unexpected response format from AI provider.";

/// Errors produced while serving a chat request
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request failed basic shape validation
    #[error("{message}")]
    InvalidRequest {
        /// Caller-facing description
        message: String,
    },

    /// The selected provider cannot serve this combination of inputs
    #[error("{message}")]
    UnsupportedModality {
        /// Provider that rejected the request
        provider: ProviderKind,
        /// Caller-facing description
        message: String,
    },

    /// A credential or other setting required by the provider is missing
    #[error("configuration error for {provider}: {message}")]
    Configuration {
        /// Provider whose configuration is incomplete
        provider: ProviderKind,
        /// Server-side description; never returned to callers
        message: String,
    },

    /// The upstream call failed (transport error or non-success status)
    #[error("{provider} upstream error: {message}")]
    Upstream {
        /// Provider that failed
        provider: ProviderKind,
        /// Best-effort human-readable message
        message: String,
        /// HTTP status returned by the provider, if any
        status: Option<u16>,
        /// Raw provider error body, for operator diagnostics only
        detail: Option<Value>,
    },

    /// The upstream call succeeded but its body did not have the expected shape
    #[error("malformed {provider} response: {message}")]
    MalformedUpstreamResponse {
        /// Provider that answered
        provider: ProviderKind,
        /// Server-side description of the shape mismatch
        message: String,
        /// Raw body as received
        detail: Option<Value>,
    },
}

impl GatewayError {
    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create an unsupported modality error
    pub fn unsupported_modality(provider: ProviderKind, message: impl Into<String>) -> Self {
        Self::UnsupportedModality {
            provider,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(provider: ProviderKind, message: impl Into<String>) -> Self {
        Self::Configuration {
            provider,
            message: message.into(),
        }
    }

    /// Create an upstream error
    pub fn upstream(
        provider: ProviderKind,
        message: impl Into<String>,
        status: Option<u16>,
        detail: Option<Value>,
    ) -> Self {
        Self::Upstream {
            provider,
            message: message.into(),
            status,
            detail,
        }
    }

    /// Create a malformed upstream response error
    pub fn malformed(
        provider: ProviderKind,
        message: impl Into<String>,
        detail: Option<Value>,
    ) -> Self {
        Self::MalformedUpstreamResponse {
            provider,
            message: message.into(),
            detail,
        }
    }

    /// HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            500
        }
    }

    /// Whether the caller is at fault
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest { .. } | Self::UnsupportedModality { .. }
        )
    }

    /// Short machine-readable kind, used in logs
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest { .. } => "invalid_request",
            Self::UnsupportedModality { .. } => "unsupported_modality",
            Self::Configuration { .. } => "configuration_error",
            Self::Upstream { .. } => "upstream_error",
            Self::MalformedUpstreamResponse { .. } => "malformed_upstream_response",
        }
    }

    /// Message that is safe to hand to the caller.
    ///
    /// Configuration and decoding problems collapse to generic text; their
    /// specifics stay in server logs.
    #[must_use]
    pub fn error_message(&self) -> String {
        match self {
            Self::InvalidRequest { message }
            | Self::UnsupportedModality { message, .. }
            | Self::Upstream { message, .. } => message.clone(),
            Self::Configuration { .. } => NOT_CONFIGURED_MESSAGE.to_string(),
            Self::MalformedUpstreamResponse { .. } => MALFORMED_RESPONSE_MESSAGE.to_string(),
        }
    }

    /// Raw provider payload attached to upstream failures
    #[must_use]
    pub fn provider_detail(&self) -> Option<&Value> {
        match self {
            Self::Upstream { detail, .. } | Self::MalformedUpstreamResponse { detail, .. } => {
                detail.as_ref()
            }
            _ => None,
        }
    }

    /// Provider involved in the failure, if the request got that far
    #[must_use]
    pub fn provider(&self) -> Option<ProviderKind> {
        match self {
            Self::InvalidRequest { .. } => None,
            Self::UnsupportedModality { provider, .. }
            | Self::Configuration { provider, .. }
            | Self::Upstream { provider, .. }
            | Self::MalformedUpstreamResponse { provider, .. } => Some(*provider),
        }
    }
}
