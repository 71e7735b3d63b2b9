//! # Authentication
//!
//! Bearer-token authentication via an Axum extractor. Every protected
//! handler takes an [`ApiKeyAuth`] argument; the request is rejected with a
//! `401 {"message": "Unauthorized"}` unless the `Authorization` header
//! carries the configured API key.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde_json::json;
use tracing::warn;

use crate::state::AppState;

/// Proof that the request presented the configured API key.
#[derive(Debug, Clone, Copy)]
pub struct ApiKeyAuth;

/// Rejection rendered when the key is missing or wrong.
pub struct AuthError;

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Unauthorized" })),
        )
            .into_response()
    }
}

impl FromRequestParts<AppState> for ApiKeyAuth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let bearer =
            Option::<TypedHeader<Authorization<Bearer>>>::from_request_parts(parts, state)
                .await
                .map_err(|e| {
                    warn!("Malformed Authorization header: {e}");
                    AuthError
                })?;

        match bearer {
            Some(TypedHeader(Authorization(bearer)))
                if bearer.token() == state.config.api_key =>
            {
                Ok(ApiKeyAuth)
            }
            Some(_) => {
                warn!("Rejected request with an invalid API key");
                Err(AuthError)
            }
            None => {
                warn!("Rejected request without an Authorization header");
                Err(AuthError)
            }
        }
    }
}
