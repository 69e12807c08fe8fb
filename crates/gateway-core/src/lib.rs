//! # Gateway Core
//!
//! Core types and error handling for the chat gateway.
//!
//! This crate provides the foundational types used throughout the gateway:
//! - Chat request and reply types
//! - Provider identity and credentials
//! - The error taxonomy shared by every layer

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod provider;
pub mod request;
pub mod response;

// Re-export commonly used types
pub use error::{GatewayError, GatewayResult};
pub use provider::{ProviderCredentials, ProviderKind};
pub use request::{BinaryPayload, ChatRequest, DEFAULT_MAX_BODY_BYTES};
pub use response::ChatReply;
