//! # Gateway Config
//!
//! Process-wide settings for the chat gateway.
//!
//! Settings come from an optional YAML/TOML/JSON file named by
//! `GATEWAY_CONFIG`, overridden by environment variables. Provider API keys
//! are only ever read from the environment.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod model;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, load_config_from, CONFIG_PATH_ENV};
pub use model::{GatewayConfig, LoggingSettings, ProvidersConfig, ServerSettings};
