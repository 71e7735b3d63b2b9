//! # Page Fetcher
//!
//! One GET, strict status and content-type checks, then the body is streamed
//! straight into the metadata extractor without buffering the whole
//! document. A single attempt per request: there are no retries anywhere in
//! the pipeline, and cancellation is simply dropping the returned future.

use crate::errors::ServiceError;
use crate::metadata::extract_metadata_from_stream;
use crate::types::PageMetadata;
use reqwest::header::CONTENT_TYPE;
use tracing::info;

/// Fetches a URL and extracts its page metadata.
///
/// Fails with [`ServiceError::UpstreamFetchFailed`] on transport errors or a
/// non-2xx response, and with [`ServiceError::UnsupportedContentType`] when
/// the response is not HTML.
pub async fn fetch_and_extract(
    client: &reqwest::Client,
    url: &str,
) -> Result<PageMetadata, ServiceError> {
    info!(%url, "fetching page");
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ServiceError::UpstreamFetchFailed(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let status_text = status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| status.as_u16().to_string());
        return Err(ServiceError::UpstreamFetchFailed(status_text));
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if !content_type.contains("text/html") {
        return Err(ServiceError::UnsupportedContentType);
    }

    extract_metadata_from_stream(response.bytes_stream()).await
}
