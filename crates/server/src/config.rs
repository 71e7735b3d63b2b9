//! # Application Configuration
//!
//! Environment-backed configuration for `glimpse-server`, loaded through the
//! `config` crate with defaults layered under the process environment.
//! `.env` files are honored via `dotenvy` in `main`.

use config::{Config as ConfigBuilder, Environment};
use serde::Deserialize;

/// The server configuration, resolved once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// The port to listen on. `PORT` env var.
    pub port: u16,
    /// The bearer token every request must present. `API_KEY` env var.
    pub api_key: String,
    /// Which AI provider to instantiate: "local" or "gemini". `AI_PROVIDER`.
    pub ai_provider: String,
    /// The provider endpoint. Required for "local"; derived from the model
    /// name for "gemini" when unset. `AI_API_URL`.
    pub ai_api_url: Option<String>,
    /// The provider API key, if the endpoint needs one. `AI_API_KEY`.
    pub ai_api_key: Option<String>,
    /// The model identifier to invoke. `AI_MODEL`.
    pub ai_model: String,
}

/// Loads the configuration from the environment.
pub fn get_config() -> anyhow::Result<Config> {
    let config = ConfigBuilder::builder()
        .set_default("port", 9090)?
        .set_default("ai_provider", "local")?
        .set_default("ai_model", "llama-3-8b-instruct")?
        .add_source(Environment::default())
        .build()?;
    config
        .try_deserialize::<Config>()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))
}
