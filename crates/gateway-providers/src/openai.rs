//! OpenAI chat completions provider (text only).

use crate::adapter::{bearer_headers, decode_envelope, join_url, required_prompt, ProviderAdapter};
use crate::upstream::UpstreamCall;
use gateway_core::{ChatRequest, GatewayError, GatewayResult, ProviderKind};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Chat model used for every request
pub const MODEL: &str = "gpt-3.5-turbo";

/// OpenAI adapter
#[derive(Debug, Clone)]
pub struct OpenAIAdapter {
    base_url: String,
}

impl Default for OpenAIAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl OpenAIAdapter {
    /// Create an adapter against a base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Chat completions URL
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        join_url(&self.base_url, "chat/completions")
    }
}

impl ProviderAdapter for OpenAIAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::ChatGpt
    }

    fn accepts_image(&self) -> bool {
        false
    }

    fn unsupported_image_message(&self) -> String {
        format!(
            "ChatGPT ({MODEL}) does not support image input directly with this setup. \
             Please choose Gemini for multimodal input or remove the image."
        )
    }

    fn build_upstream_call(
        &self,
        request: &ChatRequest,
        credential: &SecretString,
    ) -> GatewayResult<UpstreamCall> {
        let prompt = required_prompt(request)?;
        let body = serde_json::to_value(OpenAIRequest {
            model: MODEL,
            messages: vec![OpenAIMessage {
                role: "user",
                content: prompt,
            }],
        })
        .map_err(|e| {
            GatewayError::invalid_request(format!("failed to encode OpenAI request: {e}"))
        })?;

        Ok(UpstreamCall::post(
            self.endpoint_url(),
            bearer_headers(ProviderKind::ChatGpt, credential)?,
            body,
        ))
    }

    fn parse_upstream_response(&self, body: &[u8]) -> GatewayResult<String> {
        let (response, raw): (OpenAIResponse, _) = decode_envelope(ProviderKind::ChatGpt, body)?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| {
                GatewayError::malformed(
                    ProviderKind::ChatGpt,
                    "missing choices[0].message.content",
                    Some(raw),
                )
            })
    }
}

// OpenAI API Types

#[derive(Debug, Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAIMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    #[serde(default)]
    message: Option<OpenAIResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    #[serde(default)]
    content: Option<String>,
}
