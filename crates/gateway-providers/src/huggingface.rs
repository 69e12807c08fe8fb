//! Hugging Face inference API provider (text only, single model).

use crate::adapter::{bearer_headers, decode_envelope, join_url, required_prompt, ProviderAdapter};
use crate::upstream::UpstreamCall;
use gateway_core::{ChatRequest, GatewayError, GatewayResult, ProviderKind};
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::json;

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co/models";

/// Fixed text-generation model
pub const MODEL: &str = "google/flan-t5-small";

/// Hugging Face adapter
#[derive(Debug, Clone)]
pub struct HuggingFaceAdapter {
    base_url: String,
}

impl Default for HuggingFaceAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl HuggingFaceAdapter {
    /// Create an adapter against a base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Model URL
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        join_url(&self.base_url, MODEL)
    }
}

impl ProviderAdapter for HuggingFaceAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::HuggingFace
    }

    fn accepts_image(&self) -> bool {
        false
    }

    fn unsupported_image_message(&self) -> String {
        "Hugging Face text generation models do not support image input directly with this setup. \
         Please choose Gemini for multimodal input or remove the image."
            .to_string()
    }

    fn build_upstream_call(
        &self,
        request: &ChatRequest,
        credential: &SecretString,
    ) -> GatewayResult<UpstreamCall> {
        let prompt = required_prompt(request)?;
        Ok(UpstreamCall::post(
            self.endpoint_url(),
            bearer_headers(ProviderKind::HuggingFace, credential)?,
            json!({ "inputs": prompt }),
        ))
    }

    fn parse_upstream_response(&self, body: &[u8]) -> GatewayResult<String> {
        let (generations, raw): (Vec<Generation>, _) =
            decode_envelope(ProviderKind::HuggingFace, body)?;

        generations
            .into_iter()
            .next()
            .and_then(|g| g.generated_text)
            .ok_or_else(|| {
                GatewayError::malformed(
                    ProviderKind::HuggingFace,
                    "missing [0].generated_text",
                    Some(raw),
                )
            })
    }
}

#[derive(Debug, Deserialize)]
struct Generation {
    #[serde(default)]
    generated_text: Option<String>,
}
