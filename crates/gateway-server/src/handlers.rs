//! HTTP request handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use gateway_core::{ChatReply, ChatRequest};
use serde::Serialize;
use tracing::{instrument, warn};

use crate::{error::ApiError, extractors::ChatForm, state::AppState};

/// Body of the liveness probe
pub const HEALTH_MESSAGE: &str = "Backend is healthy";

/// Service banner returned by `GET /api/chat`
#[derive(Debug, Serialize)]
pub struct ChatInfo {
    /// Service name
    pub message: &'static str,
    /// Crate version
    pub version: &'static str,
}

/// `POST /api/chat`
#[instrument(skip_all)]
pub async fn chat(
    State(state): State<AppState>,
    form: ChatForm,
) -> Result<Json<ChatReply>, ApiError> {
    let request = ChatRequest::from_wire(form.prompt, form.image, form.model.as_deref())
        .map_err(|e| {
            warn!(error = %e, "Rejected chat request");
            ApiError::from_gateway(&e, state.expose_provider_details)
        })?;

    let reply = state
        .gateway
        .handle_chat_request(request)
        .await
        .map_err(|e| ApiError::from_gateway(&e, state.expose_provider_details))?;

    Ok(Json(reply))
}

/// `GET /api/chat`
pub async fn chat_info() -> Json<ChatInfo> {
    Json(ChatInfo {
        message: "Krishi AI Chat API",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /api/health`; never touches providers or credentials
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, HEALTH_MESSAGE)
}
