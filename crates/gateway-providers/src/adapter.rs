//! The capability interface every provider implements.

use crate::upstream::{UpstreamCall, UpstreamReply};
use gateway_core::{ChatRequest, GatewayError, GatewayResult, ProviderKind};
use gateway_telemetry::{redact_credential, redact_secrets};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

/// Provider-specific request building and response parsing.
///
/// Adding a provider means adding one implementation of this trait and one
/// [`ProviderKind`] variant.
pub trait ProviderAdapter: Send + Sync + fmt::Debug {
    /// Which provider this adapter talks to
    fn kind(&self) -> ProviderKind;

    /// Whether the provider accepts an image alongside the prompt
    fn accepts_image(&self) -> bool;

    /// Message returned when an image is sent to a text-only provider
    fn unsupported_image_message(&self) -> String {
        format!(
            "{} does not support image input with this setup. Please choose Gemini for multimodal input or remove the image.",
            self.kind()
        )
    }

    /// Build the outbound call for a validated request
    ///
    /// # Errors
    /// Returns error if the request cannot be encoded for this provider
    fn build_upstream_call(
        &self,
        request: &ChatRequest,
        credential: &SecretString,
    ) -> GatewayResult<UpstreamCall>;

    /// Extract the generated text from a successful response body
    ///
    /// # Errors
    /// Returns [`GatewayError::MalformedUpstreamResponse`] if the body has the wrong shape
    fn parse_upstream_response(&self, body: &[u8]) -> GatewayResult<String>;

    /// Pull a human-readable message out of a provider error body.
    ///
    /// Understands `{"error": {"message": ...}}` and `{"error": "..."}`.
    fn parse_error_message(&self, body: &Value) -> Option<String> {
        let error = body.get("error")?;
        error
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| error.as_str())
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(ToString::to_string)
    }
}

/// Turn a non-2xx reply into an [`GatewayError::Upstream`]
pub fn upstream_failure(adapter: &dyn ProviderAdapter, reply: &UpstreamReply) -> GatewayError {
    let detail = decode_body(&reply.body);
    let message = detail
        .as_ref()
        .and_then(|body| adapter.parse_error_message(body))
        .unwrap_or_else(|| format!("upstream returned HTTP {}", reply.status_line()));

    GatewayError::upstream(
        adapter.kind(),
        redact_secrets(&message).into_owned(),
        Some(reply.status),
        detail,
    )
}

/// Decode a body as JSON, falling back to a string. Secrets are masked first.
/// Empty bodies yield `None`.
pub(crate) fn decode_body(body: &[u8]) -> Option<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    let text = String::from_utf8_lossy(body);
    let clean = redact_secrets(&text);
    Some(serde_json::from_str(&clean).unwrap_or_else(|_| Value::String(clean.into_owned())))
}

/// Decode a success body into a typed envelope plus the redacted raw value
pub(crate) fn decode_envelope<T: DeserializeOwned>(
    provider: ProviderKind,
    body: &[u8],
) -> GatewayResult<(T, Value)> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        GatewayError::malformed(provider, format!("invalid JSON: {e}"), decode_body(body))
    })?;
    let envelope = serde_json::from_value(value.clone()).map_err(|e| {
        GatewayError::malformed(
            provider,
            format!("unexpected shape: {e}"),
            Some(scrub_value(value.clone(), "")),
        )
    })?;
    Ok((envelope, scrub_value(value, "")))
}

/// Strip the request credential from an error's message and provider detail.
///
/// Upstreams sometimes echo the key back ("API key not valid: ..."), and keys
/// of unknown shape slip past pattern-based redaction.
pub(crate) fn mask_credential(error: GatewayError, secret: &str) -> GatewayError {
    match error {
        GatewayError::Upstream {
            provider,
            message,
            status,
            detail,
        } => GatewayError::Upstream {
            provider,
            message: redact_credential(&message, secret).into_owned(),
            status,
            detail: detail.map(|v| scrub_value(v, secret)),
        },
        GatewayError::MalformedUpstreamResponse {
            provider,
            message,
            detail,
        } => GatewayError::MalformedUpstreamResponse {
            provider,
            message: redact_credential(&message, secret).into_owned(),
            detail: detail.map(|v| scrub_value(v, secret)),
        },
        other => other,
    }
}

/// Redact every string (keys included) inside a JSON value
pub(crate) fn scrub_value(value: Value, secret: &str) -> Value {
    match value {
        Value::String(s) => Value::String(redact_credential(&s, secret).into_owned()),
        Value::Array(items) => {
            Value::Array(items.into_iter().map(|v| scrub_value(v, secret)).collect())
        }
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| {
                    (
                        redact_credential(&k, secret).into_owned(),
                        scrub_value(v, secret),
                    )
                })
                .collect(),
        ),
        other => other,
    }
}

/// JSON content-type headers plus one sensitive credential header
pub(crate) fn json_headers(
    provider: ProviderKind,
    name: HeaderName,
    value: &str,
) -> GatewayResult<HeaderMap> {
    let mut credential = HeaderValue::from_str(value).map_err(|_| {
        GatewayError::configuration(provider, "credential contains characters not allowed in a header")
    })?;
    credential.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(name, credential);
    Ok(headers)
}

/// Headers for providers that use `Authorization: Bearer <key>`
pub(crate) fn bearer_headers(
    provider: ProviderKind,
    credential: &SecretString,
) -> GatewayResult<HeaderMap> {
    json_headers(
        provider,
        AUTHORIZATION,
        &format!("Bearer {}", credential.expose_secret()),
    )
}

/// Join a base URL and a path without doubling slashes
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Prompt text, required by text-only providers
pub(crate) fn required_prompt(request: &ChatRequest) -> GatewayResult<&str> {
    request
        .prompt
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| GatewayError::invalid_request(gateway_core::request::EMPTY_REQUEST_MESSAGE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openai::OpenAIAdapter;
    use serde_json::json;

    #[test]
    fn test_parse_error_message_shapes() {
        let adapter = OpenAIAdapter::default();
        assert_eq!(
            adapter.parse_error_message(&json!({"error": {"message": "quota exceeded"}})),
            Some("quota exceeded".to_string())
        );
        assert_eq!(
            adapter.parse_error_message(&json!({"error": "Model is currently loading"})),
            Some("Model is currently loading".to_string())
        );
        assert_eq!(adapter.parse_error_message(&json!({"error": {"code": 5}})), None);
        assert_eq!(adapter.parse_error_message(&json!("plain")), None);
    }

    #[test]
    fn test_upstream_failure_prefers_provider_message() {
        let adapter = OpenAIAdapter::default();
        let reply = UpstreamReply::new(429, r#"{"error":{"message":"Rate limit reached"}}"#);
        let err = upstream_failure(&adapter, &reply);

        assert_eq!(err.error_message(), "Rate limit reached");
        assert!(matches!(err, GatewayError::Upstream { status: Some(429), .. }));
        assert_eq!(
            err.provider_detail(),
            Some(&json!({"error": {"message": "Rate limit reached"}}))
        );
    }

    #[test]
    fn test_upstream_failure_falls_back_to_status() {
        let adapter = OpenAIAdapter::default();
        let err = upstream_failure(&adapter, &UpstreamReply::new(503, ""));
        assert_eq!(
            err.error_message(),
            "upstream returned HTTP 503 Service Unavailable"
        );
        assert!(err.provider_detail().is_none());

        let err = upstream_failure(&adapter, &UpstreamReply::new(502, "<html>bad gateway</html>"));
        assert_eq!(err.provider_detail(), Some(&json!("<html>bad gateway</html>")));
    }

    #[test]
    fn test_mask_credential_of_unknown_shape() {
        let adapter = OpenAIAdapter::default();
        let key = "gemini-secret-123";
        let reply = UpstreamReply::new(
            400,
            r#"{"error":{"message":"API key not valid: gemini-secret-123","details":["gemini-secret-123"]}}"#,
        );

        let err = mask_credential(upstream_failure(&adapter, &reply), key);

        assert_eq!(err.error_message(), "API key not valid: [REDACTED]");
        let detail = err.provider_detail().unwrap().to_string();
        assert!(!detail.contains(key));
        assert!(detail.contains("[REDACTED]"));
    }

    #[test]
    fn test_malformed_detail_is_redacted() {
        let body = br#"{"note":"echo sk-abcdefghijklmnop"}"#;
        let err = decode_envelope::<Vec<String>>(ProviderKind::ChatGpt, body).unwrap_err();
        let detail = err.provider_detail().unwrap().to_string();
        assert!(!detail.contains("sk-abcdefghijklmnop"));

        let err = mask_credential(err, "echo");
        assert!(!err.provider_detail().unwrap().to_string().contains("echo"));
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("https://a.b/v1/", "/chat"), "https://a.b/v1/chat");
        assert_eq!(join_url("https://a.b/v1", "chat"), "https://a.b/v1/chat");
    }

    #[test]
    fn test_bearer_headers_are_sensitive() {
        let headers =
            bearer_headers(ProviderKind::ChatGpt, &SecretString::new("sk-abc".into())).unwrap();
        let auth = headers.get(AUTHORIZATION).unwrap();
        assert!(auth.is_sensitive());
        assert_eq!(auth.to_str().unwrap(), "Bearer sk-abc");
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn test_bad_credential_is_configuration_error() {
        let err = bearer_headers(ProviderKind::ChatGpt, &SecretString::new("bad\nkey".into()))
            .unwrap_err();
        assert!(matches!(err, GatewayError::Configuration { .. }));
    }
}
