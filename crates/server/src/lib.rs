//! # glimpse-server
//!
//! The thin HTTP boundary over the `glimpse` pipeline: bearer-token
//! authentication, request parsing, and rendering of the uniform error
//! envelope. All real work happens in the library crate.

pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod router;
pub mod state;

use state::AppState;
use tracing::info;

/// Serves the application on an already-bound listener. Split out from
/// `main` so the test harness can drive it on a random port.
pub async fn run(listener: tokio::net::TcpListener, app_state: AppState) -> anyhow::Result<()> {
    let app = router::create_router(app_state);
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
