//! Provider identity and credentials.

use crate::error::GatewayError;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Message returned when the `model` field names no supported provider.
pub const INVALID_PROVIDER_MESSAGE: &str = "Invalid AI model selected.";

/// Supported upstream AI providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Gemini (text and vision)
    Gemini,
    /// OpenAI chat completions (text only)
    #[serde(rename = "chatgpt")]
    ChatGpt,
    /// Hugging Face inference API (text only)
    #[serde(rename = "huggingface")]
    HuggingFace,
}

impl ProviderKind {
    /// All providers, in wire order
    pub const ALL: [Self; 3] = [Self::Gemini, Self::ChatGpt, Self::HuggingFace];

    /// Wire name used in the `model` form field
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::ChatGpt => "chatgpt",
            Self::HuggingFace => "huggingface",
        }
    }

    /// Environment variable that holds this provider's API key
    #[must_use]
    pub fn credential_env(self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
            Self::ChatGpt => "OPENAI_API_KEY",
            Self::HuggingFace => "HF_API_KEY",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| GatewayError::invalid_request(INVALID_PROVIDER_MESSAGE))
    }
}

/// One optional API key per provider.
///
/// Keys are wrapped in [`SecretString`], so `Debug` never prints them.
#[derive(Debug, Clone, Default)]
pub struct ProviderCredentials {
    gemini: Option<SecretString>,
    openai: Option<SecretString>,
    huggingface: Option<SecretString>,
}

impl ProviderCredentials {
    /// Create an empty credential set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the key for a provider. Empty keys are treated as absent.
    #[must_use]
    pub fn with(mut self, provider: ProviderKind, key: impl Into<String>) -> Self {
        self.set(provider, key);
        self
    }

    /// Set the key for a provider in place. Empty keys are treated as absent.
    pub fn set(&mut self, provider: ProviderKind, key: impl Into<String>) {
        let key = key.into();
        let value = if key.trim().is_empty() {
            None
        } else {
            Some(SecretString::new(key))
        };
        *self.slot_mut(provider) = value;
    }

    /// Key for a provider, if configured
    #[must_use]
    pub fn get(&self, provider: ProviderKind) -> Option<&SecretString> {
        match provider {
            ProviderKind::Gemini => self.gemini.as_ref(),
            ProviderKind::ChatGpt => self.openai.as_ref(),
            ProviderKind::HuggingFace => self.huggingface.as_ref(),
        }
    }

    /// Whether a key is present for the provider
    #[must_use]
    pub fn contains(&self, provider: ProviderKind) -> bool {
        self.get(provider).is_some()
    }

    /// Providers without a key
    #[must_use]
    pub fn missing(&self) -> Vec<ProviderKind> {
        ProviderKind::ALL
            .into_iter()
            .filter(|kind| !self.contains(*kind))
            .collect()
    }

    fn slot_mut(&mut self, provider: ProviderKind) -> &mut Option<SecretString> {
        match provider {
            ProviderKind::Gemini => &mut self.gemini,
            ProviderKind::ChatGpt => &mut self.openai,
            ProviderKind::HuggingFace => &mut self.huggingface,
        }
    }
}
