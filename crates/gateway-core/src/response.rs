//! Response types for the gateway.

use serde::{Deserialize, Serialize};

/// Successful chat reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Generated text
    pub text: String,
}

impl ChatReply {
    /// Create a new reply
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
