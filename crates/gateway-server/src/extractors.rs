//! Request extractors for the chat endpoint.

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header,
};
use gateway_core::BinaryPayload;
use serde::Deserialize;
use tracing::debug;

use crate::error::ApiError;

/// Raw chat form fields, before validation.
///
/// Accepts `multipart/form-data` (fields `prompt`, `model` and file `image`)
/// or a JSON body `{"prompt": ..., "model": ...}`.
#[derive(Debug, Default)]
pub struct ChatForm {
    /// Text prompt
    pub prompt: Option<String>,
    /// Provider name
    pub model: Option<String>,
    /// Uploaded image
    pub image: Option<BinaryPayload>,
}

#[derive(Debug, Deserialize)]
struct JsonChatBody {
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default)]
    model: Option<String>,
}

#[async_trait]
impl<S> FromRequest<S> for ChatForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
            return read_multipart(multipart).await;
        }

        if content_type.starts_with("application/json") {
            let bytes = axum::body::Bytes::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(format!("Failed to read request body: {e}")))?;
            let body: JsonChatBody = serde_json::from_slice(&bytes).map_err(|e| {
                debug!(error = %e, "JSON parse error");
                ApiError::bad_request(format!("Invalid JSON: {e}"))
            })?;
            return Ok(Self {
                prompt: body.prompt,
                model: body.model,
                image: None,
            });
        }

        // No recognizable body; let request validation report what is missing.
        Ok(Self::default())
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<ChatForm, ApiError> {
    let mut form = ChatForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "prompt" => form.prompt = Some(read_text(field).await?),
            "model" => form.model = Some(read_text(field).await?),
            "image" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let mime_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read image: {e}")))?;
                debug!(size = bytes.len(), mime_type = %mime_type, "Received image upload");
                form.image = Some(BinaryPayload::new(bytes, mime_type, file_name));
            }
            other => debug!(field = other, "Ignoring unknown form field"),
        }
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid form field: {e}")))
}
