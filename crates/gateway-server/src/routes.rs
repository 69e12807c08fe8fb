//! Route definitions for the chat API.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;

use crate::{handlers, middleware, state::AppState};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.max_body_bytes;

    Router::new()
        .route("/api/chat", post(handlers::chat).get(handlers::chat_info))
        .route("/api/health", get(handlers::health_check))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::set_request_id_layer())
                .layer(middleware::trace_layer())
                .layer(middleware::propagate_request_id_layer())
                .layer(middleware::cors_layer()),
        )
        .with_state(state)
}
