//! # Common Test Utilities
//!
//! A full-application harness for the server integration tests: spawns the
//! real Axum app on a random port, with a single `httpmock::MockServer`
//! standing in for both the upstream page host and the OpenAI-compatible
//! model endpoint.

#![allow(unused)]

use anyhow::Result;
use glimpse_server::{
    config::Config,
    run,
    state::{build_app_state, AppState},
};
use httpmock::MockServer;
use reqwest::Client;
use tokio::{net::TcpListener, task::JoinHandle};

pub const TEST_API_KEY: &str = "test-api-key";

pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    _server_handle: JoinHandle<()>,
}

impl TestApp {
    /// Spawns the application server and returns a `TestApp` instance.
    pub async fn spawn() -> Result<Self> {
        let _ = tracing_subscriber();

        let mock_server = MockServer::start();
        let config = Config {
            port: 0,
            api_key: TEST_API_KEY.to_string(),
            ai_provider: "local".to_string(),
            ai_api_url: Some(mock_server.url("/v1/chat/completions")),
            ai_api_key: None,
            ai_model: "mock-chat-model".to_string(),
        };
        let app_state = build_app_state(config)?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let address = format!("http://{}", listener.local_addr()?);
        let server_handle = tokio::spawn(async move {
            if let Err(e) = run(listener, app_state).await {
                eprintln!("[TestApp] Server error: {e}");
            }
        });

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            _server_handle: server_handle,
        })
    }

    /// POSTs to `/summarize` with the test API key.
    pub async fn summarize(&self, body: serde_json::Value) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(format!("{}/summarize", self.address))
            .bearer_auth(TEST_API_KEY)
            .json(&body)
            .send()
            .await?)
    }

    /// The URL the mock server serves the page under, as seen by the app.
    pub fn page_url(&self) -> String {
        self.mock_server.url("/page")
    }
}

fn tracing_subscriber() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!("{e}"))
}
