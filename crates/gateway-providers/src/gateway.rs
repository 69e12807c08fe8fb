//! The request gateway.
//!
//! [`ChatGateway::handle_chat_request`] validates a request, picks the adapter
//! for its provider, resolves the credential, performs exactly one upstream
//! call and normalizes the outcome. There is no retry and no shared mutable
//! state; the gateway can be shared freely behind an `Arc`.

use crate::adapter::{mask_credential, upstream_failure, ProviderAdapter};
use crate::gemini::GeminiAdapter;
use crate::huggingface::HuggingFaceAdapter;
use crate::openai::OpenAIAdapter;
use crate::upstream::{HttpTransport, TransportError, UpstreamTransport};
use gateway_core::{
    ChatReply, ChatRequest, GatewayError, GatewayResult, ProviderCredentials, ProviderKind,
};
use gateway_telemetry::{redact_credential, sanitize_for_log};
use secrecy::ExposeSecret;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Longest error message written to a log line
const LOG_ERROR_CHARS: usize = 200;

/// Provider-dispatching chat gateway
pub struct ChatGateway {
    gemini: GeminiAdapter,
    openai: OpenAIAdapter,
    huggingface: HuggingFaceAdapter,
    credentials: ProviderCredentials,
    transport: Arc<dyn UpstreamTransport>,
}

impl fmt::Debug for ChatGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatGateway")
            .field("gemini", &self.gemini)
            .field("openai", &self.openai)
            .field("huggingface", &self.huggingface)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl ChatGateway {
    /// Create a new builder
    #[must_use]
    pub fn builder() -> ChatGatewayBuilder {
        ChatGatewayBuilder::default()
    }

    /// Adapter for a provider
    #[must_use]
    pub fn adapter(&self, provider: ProviderKind) -> &dyn ProviderAdapter {
        match provider {
            ProviderKind::Gemini => &self.gemini,
            ProviderKind::ChatGpt => &self.openai,
            ProviderKind::HuggingFace => &self.huggingface,
        }
    }

    /// Providers that have a credential configured
    #[must_use]
    pub fn configured_providers(&self) -> Vec<ProviderKind> {
        ProviderKind::ALL
            .into_iter()
            .filter(|kind| self.credentials.contains(*kind))
            .collect()
    }

    /// Serve one chat request.
    ///
    /// # Errors
    /// - [`GatewayError::InvalidRequest`] if the request has no content
    /// - [`GatewayError::Configuration`] if the provider has no credential
    /// - [`GatewayError::UnsupportedModality`] if an image goes to a text-only provider
    /// - [`GatewayError::Upstream`] if the call fails or returns a non-2xx status
    /// - [`GatewayError::MalformedUpstreamResponse`] if the reply cannot be decoded
    #[instrument(skip_all, fields(provider = %request.provider))]
    pub async fn handle_chat_request(&self, request: ChatRequest) -> GatewayResult<ChatReply> {
        info!(
            provider = %request.provider,
            prompt_len = request.prompt_len(),
            has_image = request.has_image(),
            image_name = request.image.as_ref().map(|i| i.original_name.as_str()),
            image_mime = request.image.as_ref().map(|i| i.mime_type.as_str()),
            "Received chat request"
        );

        let start = Instant::now();
        let result = self.dispatch(&request).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(reply) => info!(
                provider = %request.provider,
                latency_ms,
                response_len = reply.text.chars().count(),
                "Chat request succeeded"
            ),
            Err(e) => warn!(
                provider = %request.provider,
                kind = e.kind(),
                status = ?upstream_status(e),
                latency_ms,
                error = %sanitize_for_log(&e.to_string(), LOG_ERROR_CHARS),
                "Chat request failed"
            ),
        }

        result
    }

    async fn dispatch(&self, request: &ChatRequest) -> GatewayResult<ChatReply> {
        request.validate()?;

        let provider = request.provider;
        let adapter = self.adapter(provider);

        let credential = self.credentials.get(provider).ok_or_else(|| {
            GatewayError::configuration(
                provider,
                format!("{} is not set", provider.credential_env()),
            )
        })?;

        if request.has_image() && !adapter.accepts_image() {
            return Err(GatewayError::unsupported_modality(
                provider,
                adapter.unsupported_image_message(),
            ));
        }

        let secret = credential.expose_secret();
        let call = adapter.build_upstream_call(request, credential)?;
        debug!(url = %call.url, "Sending upstream request");

        let reply = self.transport.execute(call).await.map_err(|e| {
            GatewayError::upstream(
                provider,
                redact_credential(&e.to_string(), secret).into_owned(),
                None,
                None,
            )
        })?;

        if !reply.is_success() {
            return Err(mask_credential(upstream_failure(adapter, &reply), secret));
        }

        adapter
            .parse_upstream_response(&reply.body)
            .map(ChatReply::new)
            .map_err(|e| mask_credential(e, secret))
    }
}

fn upstream_status(error: &GatewayError) -> Option<u16> {
    match error {
        GatewayError::Upstream { status, .. } => *status,
        _ => None,
    }
}

/// Builder for [`ChatGateway`]
#[derive(Default)]
pub struct ChatGatewayBuilder {
    credentials: ProviderCredentials,
    gemini_base_url: Option<String>,
    openai_base_url: Option<String>,
    huggingface_base_url: Option<String>,
    transport: Option<Arc<dyn UpstreamTransport>>,
}

impl ChatGatewayBuilder {
    /// Set provider credentials
    #[must_use]
    pub fn credentials(mut self, credentials: ProviderCredentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Override the Gemini API base URL
    #[must_use]
    pub fn gemini_base_url(mut self, url: impl Into<String>) -> Self {
        self.gemini_base_url = Some(url.into());
        self
    }

    /// Override the OpenAI API base URL
    #[must_use]
    pub fn openai_base_url(mut self, url: impl Into<String>) -> Self {
        self.openai_base_url = Some(url.into());
        self
    }

    /// Override the Hugging Face API base URL
    #[must_use]
    pub fn huggingface_base_url(mut self, url: impl Into<String>) -> Self {
        self.huggingface_base_url = Some(url.into());
        self
    }

    /// Use a custom transport
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn UpstreamTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the gateway
    ///
    /// # Errors
    /// Returns error if the default HTTP transport cannot be created
    pub fn build(self) -> Result<ChatGateway, TransportError> {
        let transport: Arc<dyn UpstreamTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new()?),
        };

        Ok(ChatGateway {
            gemini: self
                .gemini_base_url
                .map_or_else(GeminiAdapter::default, GeminiAdapter::new),
            openai: self
                .openai_base_url
                .map_or_else(OpenAIAdapter::default, OpenAIAdapter::new),
            huggingface: self
                .huggingface_base_url
                .map_or_else(HuggingFaceAdapter::default, HuggingFaceAdapter::new),
            credentials: self.credentials,
            transport,
        })
    }
}
