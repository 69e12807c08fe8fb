//! Google Gemini provider.
//!
//! Uses the Google AI Studio `generateContent` endpoint:
//! `https://generativelanguage.googleapis.com/v1beta/models/{MODEL}:generateContent`
//!
//! Images travel inline as base64 next to the text part. The API key is sent
//! in the `x-goog-api-key` header rather than the `key=` query parameter so it
//! never appears in URLs or transport errors.

use crate::adapter::{decode_envelope, join_url, json_headers, ProviderAdapter};
use crate::upstream::UpstreamCall;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use gateway_core::{ChatRequest, GatewayError, GatewayResult, ProviderKind};
use reqwest::header::HeaderName;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used for text-only requests
pub const TEXT_MODEL: &str = "gemini-pro";

/// Vision-capable model used when an image is attached
pub const VISION_MODEL: &str = "gemini-pro-vision";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini adapter
#[derive(Debug, Clone)]
pub struct GeminiAdapter {
    base_url: String,
}

impl Default for GeminiAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl GeminiAdapter {
    /// Create an adapter against a base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Model variant for a request
    #[must_use]
    pub fn model_for(request: &ChatRequest) -> &'static str {
        if request.has_image() {
            VISION_MODEL
        } else {
            TEXT_MODEL
        }
    }

    /// `generateContent` URL for a model
    #[must_use]
    pub fn endpoint_url(&self, model: &str) -> String {
        join_url(&self.base_url, &format!("models/{model}:generateContent"))
    }

    fn transform_request(request: &ChatRequest) -> GeminiRequest {
        let mut parts = Vec::with_capacity(2);

        if let Some(prompt) = request.prompt.as_deref().filter(|p| !p.is_empty()) {
            parts.push(GeminiPart::Text {
                text: prompt.to_string(),
            });
        }

        if let Some(image) = &request.image {
            parts.push(GeminiPart::InlineData {
                inline_data: GeminiInlineData {
                    mime_type: image.mime_type.clone(),
                    data: STANDARD.encode(&image.bytes),
                },
            });
        }

        GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts,
            }],
        }
    }
}

impl ProviderAdapter for GeminiAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn accepts_image(&self) -> bool {
        true
    }

    fn build_upstream_call(
        &self,
        request: &ChatRequest,
        credential: &SecretString,
    ) -> GatewayResult<UpstreamCall> {
        let headers = json_headers(
            ProviderKind::Gemini,
            HeaderName::from_static(API_KEY_HEADER),
            credential.expose_secret(),
        )?;

        let body = serde_json::to_value(Self::transform_request(request)).map_err(|e| {
            GatewayError::invalid_request(format!("failed to encode Gemini request: {e}"))
        })?;

        Ok(UpstreamCall::post(
            self.endpoint_url(Self::model_for(request)),
            headers,
            body,
        ))
    }

    fn parse_upstream_response(&self, body: &[u8]) -> GatewayResult<String> {
        let (response, raw): (GeminiResponse, _) = decode_envelope(ProviderKind::Gemini, body)?;

        response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .ok_or_else(|| {
                GatewayError::malformed(
                    ProviderKind::Gemini,
                    "missing candidates[0].content.parts[0].text",
                    Some(raw),
                )
            })
    }
}

// Gemini API Types

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiCandidateContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiCandidatePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use gateway_core::BinaryPayload;
    use serde_json::json;

    fn key() -> SecretString {
        SecretString::new("AIza-test-key".into())
    }

    fn leaf() -> BinaryPayload {
        BinaryPayload::new(b"leaf".to_vec(), "image/jpeg", "leaf.jpg")
    }

    #[test]
    fn test_text_request_uses_text_model() {
        let adapter = GeminiAdapter::default();
        let request = ChatRequest::text(ProviderKind::Gemini, "Best time to sow aman rice?").unwrap();
        let call = adapter.build_upstream_call(&request, &key()).unwrap();

        assert_eq!(
            call.url,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent"
        );
        assert_eq!(
            call.body,
            json!({"contents": [{"role": "user", "parts": [{"text": "Best time to sow aman rice?"}]}]})
        );
    }

    #[test]
    fn test_image_request_embeds_base64_and_uses_vision_model() {
        let adapter = GeminiAdapter::default();
        let request = ChatRequest::new(
            Some("What disease is this?".into()),
            Some(leaf()),
            ProviderKind::Gemini,
        )
        .unwrap();
        let call = adapter.build_upstream_call(&request, &key()).unwrap();

        assert!(call.url.ends_with("/models/gemini-pro-vision:generateContent"));
        assert_eq!(
            call.body["contents"][0]["parts"],
            json!([
                {"text": "What disease is this?"},
                {"inlineData": {"mimeType": "image/jpeg", "data": "bGVhZg=="}}
            ])
        );
    }

    #[test]
    fn test_image_only_request_has_single_part() {
        let adapter = GeminiAdapter::default();
        let request = ChatRequest::new(None, Some(leaf()), ProviderKind::Gemini).unwrap();
        let call = adapter.build_upstream_call(&request, &key()).unwrap();

        let parts = call.body["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 1);
        assert!(parts[0].get("inlineData").is_some());
    }

    #[test]
    fn test_key_in_header_not_url() {
        let adapter = GeminiAdapter::new("http://localhost:9999/v1beta/");
        let request = ChatRequest::text(ProviderKind::Gemini, "hi").unwrap();
        let call = adapter.build_upstream_call(&request, &key()).unwrap();

        assert_eq!(
            call.url,
            "http://localhost:9999/v1beta/models/gemini-pro:generateContent"
        );
        assert!(!call.url.contains("key="));
        let header = call.headers.get(API_KEY_HEADER).unwrap();
        assert!(header.is_sensitive());
        assert_eq!(header.to_str().unwrap(), "AIza-test-key");
    }

    #[test]
    fn test_parse_success() {
        let body = br#"{"candidates":[{"content":{"parts":[{"text":"OK"}],"role":"model"},"finishReason":"STOP"}]}"#;
        let text = GeminiAdapter::default().parse_upstream_response(body).unwrap();
        assert_eq!(text, "OK");
    }

    #[test]
    fn test_parse_missing_text_is_malformed() {
        let adapter = GeminiAdapter::default();
        for body in [
            &br#"{"candidates":[]}"#[..],
            br#"{"promptFeedback":{"blockReason":"SAFETY"}}"#,
            br#"{"candidates":[{"finishReason":"SAFETY"}]}"#,
            br#"{"candidates":[{"content":{"parts":[]}}]}"#,
            br#"{"candidates":"nope"}"#,
            b"not json",
        ] {
            let err = adapter.parse_upstream_response(body).unwrap_err();
            assert!(
                matches!(err, GatewayError::MalformedUpstreamResponse { .. }),
                "unexpected error for {}: {err:?}",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn test_capabilities() {
        let adapter = GeminiAdapter::default();
        assert_eq!(adapter.kind(), ProviderKind::Gemini);
        assert!(adapter.accepts_image());
    }
}
