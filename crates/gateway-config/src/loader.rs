//! Configuration loading: optional file, then environment, then validation.

use crate::error::{ConfigError, ConfigResult};
use crate::model::GatewayConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "GATEWAY_CONFIG";

/// Load configuration from `GATEWAY_CONFIG` (if set) and the process environment
///
/// # Errors
/// Returns error if the file cannot be read or parsed, an environment value is
/// malformed, or the result fails validation
pub async fn load_config() -> ConfigResult<GatewayConfig> {
    let path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
    load_config_from(path.as_deref(), |key| std::env::var(key).ok()).await
}

/// Load configuration from an optional file and an explicit environment lookup
///
/// # Errors
/// See [`load_config`]
pub async fn load_config_from<F>(path: Option<&Path>, lookup: F) -> ConfigResult<GatewayConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let config = read_file(path).await?;
            info!(path = %path.display(), "Loaded configuration file");
            config
        }
        None => {
            debug!("No configuration file, using defaults");
            GatewayConfig::default()
        }
    };

    config.apply_env_with(lookup)?;
    config.check()?;
    Ok(config)
}

async fn read_file(path: &Path) -> ConfigResult<GatewayConfig> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let parse_error = |message: String| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    };

    match extension.as_deref() {
        Some("yaml" | "yml") => {
            serde_yaml::from_str(&contents).map_err(|e| parse_error(e.to_string()))
        }
        Some("toml") => toml::from_str(&contents).map_err(|e| parse_error(e.to_string())),
        Some("json") => serde_json::from_str(&contents).map_err(|e| parse_error(e.to_string())),
        _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    }
}
