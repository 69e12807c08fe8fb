//! # Chat Gateway
//!
//! HTTP gateway that forwards a prompt (and optionally an image) to Gemini,
//! ChatGPT or a Hugging Face hosted model and returns the generated text.
//!
//! ## Usage
//!
//! ```bash
//! # Start with defaults (port 3001), keys from the environment or .env
//! GEMINI_API_KEY=... OPENAI_API_KEY=... HF_API_KEY=... chat-gateway
//!
//! # Start with a config file
//! GATEWAY_CONFIG=/path/to/gateway.yaml chat-gateway
//! ```

use anyhow::Context;
use gateway_config::{load_config, GatewayConfig};
use gateway_providers::ChatGateway;
use gateway_server::{AppState, Server, ServerConfig};
use gateway_telemetry::{init_logging, LoggingConfig};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Missing .env is normal in production.
    let dotenv = dotenvy::dotenv();

    let config = match load_config().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(&logging_config(&config)) {
        eprintln!("Failed to initialize logging: {e}");
    }

    if let Ok(path) = dotenv {
        info!(path = %path.display(), "Loaded environment file");
    }

    info!(version = env!("CARGO_PKG_VERSION"), "Starting chat gateway");

    if let Err(e) = run(config).await {
        error!(error = %e, "Application failed");
        std::process::exit(1);
    }
}

async fn run(config: GatewayConfig) -> anyhow::Result<()> {
    for kind in config.credentials.missing() {
        warn!(
            provider = %kind,
            "{} not set, requests for this provider will fail",
            kind.credential_env()
        );
    }

    let gateway = build_gateway(&config)?;
    info!(
        configured = ?gateway.configured_providers(),
        "Provider gateway initialized"
    );

    let state = AppState::new(gateway)
        .with_expose_provider_details(config.server.expose_provider_details)
        .with_max_body_bytes(config.server.max_body_bytes);

    if config.server.expose_provider_details {
        warn!("Raw provider error bodies will be returned to callers");
    }

    let server = Server::new(
        ServerConfig::new(config.server.host.clone(), config.server.port),
        state,
    );
    server.run().await.context("HTTP server failed")?;

    Ok(())
}

fn build_gateway(config: &GatewayConfig) -> anyhow::Result<ChatGateway> {
    let mut builder = ChatGateway::builder().credentials(config.credentials.clone());

    if let Some(url) = &config.providers.gemini_base_url {
        builder = builder.gemini_base_url(url);
    }
    if let Some(url) = &config.providers.openai_base_url {
        builder = builder.openai_base_url(url);
    }
    if let Some(url) = &config.providers.huggingface_base_url {
        builder = builder.huggingface_base_url(url);
    }

    builder.build().context("failed to create HTTP client")
}

fn logging_config(config: &GatewayConfig) -> LoggingConfig {
    LoggingConfig::new()
        .with_level(config.logging.level.clone())
        .with_format(config.logging.format)
}
