//! # Gateway Providers
//!
//! Upstream AI provider adapters and the request gateway.
//!
//! This crate provides:
//! - Google Gemini (text and vision)
//! - OpenAI chat completions (text only)
//! - Hugging Face inference API (text only)
//! - [`ChatGateway`], which dispatches a validated request to one of them

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod adapter;
pub mod gateway;
pub mod gemini;
pub mod huggingface;
pub mod openai;
pub mod upstream;

// Re-export main types
pub use adapter::ProviderAdapter;
pub use gateway::{ChatGateway, ChatGatewayBuilder};
pub use gemini::GeminiAdapter;
pub use huggingface::HuggingFaceAdapter;
pub use openai::OpenAIAdapter;
pub use upstream::{HttpTransport, TransportError, UpstreamCall, UpstreamReply, UpstreamTransport};
