//! # Gateway Server
//!
//! HTTP front end for the chat gateway.
//!
//! - `POST /api/chat`: multipart or JSON chat request
//! - `GET /api/chat`: service banner
//! - `GET /api/health`: liveness probe
//!
//! Also wires CORS, request IDs, per-request tracing, the body size limit
//! and graceful shutdown.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod shutdown;
pub mod state;

pub use error::{ApiError, ErrorBody};
pub use routes::create_router;
pub use server::{Server, ServerConfig, ServerError};
pub use shutdown::shutdown_signal;
pub use state::AppState;
