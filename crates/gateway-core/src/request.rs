//! Chat request types.
//!
//! A [`ChatRequest`] is what the gateway serves: an optional text prompt, an
//! optional uploaded image and the provider that should answer it.

use crate::error::{GatewayError, GatewayResult};
use crate::provider::ProviderKind;
use bytes::Bytes;
use std::fmt;

/// Message returned when neither a prompt nor an image was supplied.
pub const EMPTY_REQUEST_MESSAGE: &str = "Prompt or image is required.";

/// Default cap on a chat request body, image included (10 MiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// MIME type assumed for uploads that arrive without one
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// An uploaded file, held in memory for the lifetime of one request
#[derive(Clone, PartialEq, Eq)]
pub struct BinaryPayload {
    /// Raw file contents
    pub bytes: Bytes,
    /// MIME type reported by the client
    pub mime_type: String,
    /// File name reported by the client
    pub original_name: String,
}

impl BinaryPayload {
    /// Create a new payload
    pub fn new(
        bytes: impl Into<Bytes>,
        mime_type: impl Into<String>,
        original_name: impl Into<String>,
    ) -> Self {
        let mime_type = mime_type.into();
        Self {
            bytes: bytes.into(),
            mime_type: if mime_type.trim().is_empty() {
                DEFAULT_MIME_TYPE.to_string()
            } else {
                mime_type
            },
            original_name: original_name.into(),
        }
    }

    /// Payload size in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload has no content
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// Keep image bytes out of logs.
impl fmt::Debug for BinaryPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryPayload")
            .field("len", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .field("original_name", &self.original_name)
            .finish()
    }
}

/// A validated chat request
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Text prompt; never empty when present
    pub prompt: Option<String>,
    /// Uploaded image; never zero-length when present
    pub image: Option<BinaryPayload>,
    /// Provider that should answer
    pub provider: ProviderKind,
}

impl ChatRequest {
    /// Build a request from already-typed parts.
    ///
    /// Empty prompts and zero-byte images are normalized to `None`.
    ///
    /// # Errors
    /// Returns [`GatewayError::InvalidRequest`] if neither a prompt nor an image remains.
    pub fn new(
        prompt: Option<String>,
        image: Option<BinaryPayload>,
        provider: ProviderKind,
    ) -> GatewayResult<Self> {
        let request = Self {
            prompt: prompt.filter(|p| !p.is_empty()),
            image: image.filter(|i| !i.is_empty()),
            provider,
        };
        request.validate()?;
        Ok(request)
    }

    /// Build a request from raw wire fields.
    ///
    /// Content is checked before the provider name, so an empty request with an
    /// unknown model reports the missing content.
    ///
    /// # Errors
    /// Returns [`GatewayError::InvalidRequest`] for empty content or an unknown provider.
    pub fn from_wire(
        prompt: Option<String>,
        image: Option<BinaryPayload>,
        model: Option<&str>,
    ) -> GatewayResult<Self> {
        let prompt = prompt.filter(|p| !p.is_empty());
        let image = image.filter(|i| !i.is_empty());
        if prompt.is_none() && image.is_none() {
            return Err(GatewayError::invalid_request(EMPTY_REQUEST_MESSAGE));
        }
        let provider = model.unwrap_or_default().parse::<ProviderKind>()?;
        Self::new(prompt, image, provider)
    }

    /// Create a text-only request
    ///
    /// # Errors
    /// Returns [`GatewayError::InvalidRequest`] if the prompt is empty.
    pub fn text(provider: ProviderKind, prompt: impl Into<String>) -> GatewayResult<Self> {
        Self::new(Some(prompt.into()), None, provider)
    }

    /// Check the request invariants
    ///
    /// # Errors
    /// Returns [`GatewayError::InvalidRequest`] if neither a prompt nor an image is set.
    pub fn validate(&self) -> GatewayResult<()> {
        let has_prompt = self.prompt.as_deref().is_some_and(|p| !p.is_empty());
        let has_image = self.image.as_ref().is_some_and(|i| !i.is_empty());
        if has_prompt || has_image {
            Ok(())
        } else {
            Err(GatewayError::invalid_request(EMPTY_REQUEST_MESSAGE))
        }
    }

    /// Prompt length in characters (0 if absent)
    #[must_use]
    pub fn prompt_len(&self) -> usize {
        self.prompt.as_deref().map_or(0, |p| p.chars().count())
    }

    /// Whether an image is attached
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }
}
