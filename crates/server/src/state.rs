//! # Application State
//!
//! The shared state handed to every request handler: the resolved
//! configuration, one HTTP client for upstream page fetches, and the
//! configured AI provider. All of it immutable after startup.

use crate::config::Config;
use glimpse::providers::ai::{gemini::GeminiProvider, local::LocalAiProvider, AiProvider};
use std::sync::Arc;

/// The shared application state, accessible from all request handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Arc<Config>,
    pub http_client: reqwest::Client,
    pub ai_provider: Arc<dyn AiProvider>,
}

/// Builds the shared application state from the configuration.
pub fn build_app_state(config: Config) -> anyhow::Result<AppState> {
    let ai_provider: Arc<dyn AiProvider> = match config.ai_provider.as_str() {
        "gemini" => {
            let api_key = config
                .ai_api_key
                .clone()
                .ok_or_else(|| anyhow::anyhow!("AI_API_KEY is required for the gemini provider"))?;
            // If the URL is not provided, construct it from the model name.
            let api_url = config.ai_api_url.clone().unwrap_or_else(|| {
                format!(
                    "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
                    config.ai_model
                )
            });
            Arc::new(GeminiProvider::new(api_url, api_key).map_err(anyhow::Error::new)?)
        }
        "local" => {
            let api_url = config.ai_api_url.clone().ok_or_else(|| {
                anyhow::anyhow!("AI_API_URL is required for the local provider")
            })?;
            Arc::new(
                LocalAiProvider::new(
                    api_url,
                    config.ai_api_key.clone(),
                    Some(config.ai_model.clone()),
                )
                .map_err(anyhow::Error::new)?,
            )
        }
        other => {
            return Err(anyhow::anyhow!("Unsupported AI provider: {other}"));
        }
    };

    let http_client = reqwest::Client::builder().build()?;

    Ok(AppState {
        config: Arc::new(config),
        http_client,
        ai_provider,
    })
}
