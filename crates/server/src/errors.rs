use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use glimpse::ServiceError;
use serde_json::json;
use tracing::{error, warn};

/// The server-side wrapper over the library's error envelope.
///
/// Every failure in the pipeline arrives here as exactly one `ServiceError`
/// and is rendered as `{"message": ...}` with the status the error carries.
/// Internal errors are logged with full detail but rendered generically.
pub struct AppError(pub ServiceError);

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        AppError(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError(ServiceError::Internal(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = match &self.0 {
            ServiceError::Internal(err) => {
                error!("Internal server error: {err:?}");
                "Error processing request".to_string()
            }
            other => {
                warn!("Request failed: {other}");
                other.to_string()
            }
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}
