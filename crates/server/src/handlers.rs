use crate::{auth::ApiKeyAuth, errors::AppError, state::AppState};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use glimpse::{fetch_and_extract, generate_structured_summary, ServiceError};
use serde::{Deserialize, Serialize};
use tracing::info;

/// The request body for the `/summarize` endpoint.
#[derive(Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub url: String,
}

/// The response body for the `/summarize` endpoint.
#[derive(Serialize)]
pub struct SummarizeResponse {
    pub url: String,
    pub title: String,
    pub summary: String,
    pub tags: Vec<String>,
}

/// The root handler.
pub async fn root() -> &'static str {
    "glimpse server is running."
}

/// The health check handler.
pub async fn health_check() -> &'static str {
    "OK"
}

/// The handler for the `/summarize` endpoint.
///
/// Runs the whole pipeline in sequence: fetch the page, extract its
/// metadata, generate the structured summary. The URL is validated before
/// any network call is made. Body-parse failures are caught here so every
/// response, including rejections, carries the `{"message": ...}` envelope.
pub async fn summarize_handler(
    _auth: ApiKeyAuth,
    State(app_state): State<AppState>,
    payload: Result<Json<SummarizeRequest>, JsonRejection>,
) -> Result<Json<SummarizeResponse>, AppError> {
    let Json(payload) = payload.map_err(|e| ServiceError::BadRequest(e.body_text()))?;
    if payload.url.trim().is_empty() {
        return Err(ServiceError::BadRequest("URL is required".to_string()).into());
    }
    info!(url = %payload.url, "received summarize request");

    let metadata = fetch_and_extract(&app_state.http_client, &payload.url).await?;
    let summary = generate_structured_summary(app_state.ai_provider.as_ref(), &metadata).await?;

    Ok(Json(SummarizeResponse {
        url: payload.url,
        title: summary.title,
        summary: summary.summary,
        tags: summary.tags,
    }))
}

/// Fallback for requests hitting a known route with the wrong method.
pub async fn method_not_allowed() -> AppError {
    ServiceError::MethodNotAllowed.into()
}
