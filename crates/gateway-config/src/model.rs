//! Configuration model.

use crate::error::{ConfigError, ConfigResult};
use gateway_core::{ProviderCredentials, ProviderKind, DEFAULT_MAX_BODY_BYTES};
use gateway_telemetry::LogFormat;
use serde::Deserialize;
use std::str::FromStr;
use validator::Validate;

/// Default listen port
pub const DEFAULT_PORT: u16 = 3001;

/// Top-level gateway configuration
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP server settings
    #[validate(nested)]
    pub server: ServerSettings,

    /// Upstream endpoint overrides
    #[validate(nested)]
    pub providers: ProvidersConfig,

    /// Logging settings
    pub logging: LoggingSettings,

    /// Provider API keys; only ever populated from the environment
    #[serde(skip)]
    pub credentials: ProviderCredentials,
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct ServerSettings {
    /// Bind address
    #[validate(length(min = 1))]
    pub host: String,

    /// Listen port
    #[validate(range(min = 1))]
    pub port: u16,

    /// Maximum accepted request body, including uploaded images
    #[validate(range(min = 1))]
    pub max_body_bytes: usize,

    /// Include raw provider error bodies (`api_error_details`) in 500 responses.
    /// Keep off when the gateway faces the public internet.
    pub expose_provider_details: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            expose_provider_details: false,
        }
    }
}

/// Upstream base URL overrides; `None` means the provider's public endpoint
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Gemini API base, e.g. `https://generativelanguage.googleapis.com/v1beta`
    #[validate(url)]
    pub gemini_base_url: Option<String>,

    /// OpenAI API base, e.g. `https://api.openai.com/v1`
    #[validate(url)]
    pub openai_base_url: Option<String>,

    /// Hugging Face inference base, e.g. `https://api-inference.huggingface.co/models`
    #[validate(url)]
    pub huggingface_base_url: Option<String>,
}

/// Logging settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive
    pub level: String,
    /// `pretty` or `json`
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl GatewayConfig {
    /// Apply environment overrides using the given lookup.
    ///
    /// Recognized variables: `HOST`, `PORT`, `GATEWAY_MAX_BODY_BYTES`,
    /// `GATEWAY_EXPOSE_PROVIDER_DETAILS`, `GEMINI_BASE_URL`, `OPENAI_BASE_URL`,
    /// `HF_BASE_URL`, `LOG_LEVEL`, `LOG_FORMAT` and the provider API keys.
    ///
    /// # Errors
    /// Returns error if a numeric or boolean variable cannot be parsed
    pub fn apply_env_with<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(host) = var("HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("PORT") {
            self.server.port = parse_env("PORT", &port)?;
        }
        if let Some(limit) = var("GATEWAY_MAX_BODY_BYTES") {
            self.server.max_body_bytes = parse_env("GATEWAY_MAX_BODY_BYTES", &limit)?;
        }
        if let Some(flag) = var("GATEWAY_EXPOSE_PROVIDER_DETAILS") {
            self.server.expose_provider_details =
                parse_bool("GATEWAY_EXPOSE_PROVIDER_DETAILS", &flag)?;
        }

        if let Some(url) = var("GEMINI_BASE_URL") {
            self.providers.gemini_base_url = Some(url);
        }
        if let Some(url) = var("OPENAI_BASE_URL") {
            self.providers.openai_base_url = Some(url);
        }
        if let Some(url) = var("HF_BASE_URL") {
            self.providers.huggingface_base_url = Some(url);
        }

        if let Some(level) = var("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("LOG_FORMAT") {
            self.logging.format = parse_env("LOG_FORMAT", &format)?;
        }

        for kind in ProviderKind::ALL {
            if let Some(key) = var(kind.credential_env()) {
                self.credentials.set(kind, key);
            }
        }

        Ok(())
    }

    /// Validate the configuration
    ///
    /// # Errors
    /// Returns [`ConfigError::Validation`] describing every failing field
    pub fn check(&self) -> ConfigResult<()> {
        Validate::validate(self).map_err(|e| ConfigError::Validation(e.to_string()))
    }

    /// Address to bind, as `host:port`
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_env<T>(var: &str, value: &str) -> ConfigResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::invalid_env(var, format!("'{value}': {e}")))
}

fn parse_bool(var: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::invalid_env(
            var,
            format!("'{other}' is not a boolean"),
        )),
    }
}
