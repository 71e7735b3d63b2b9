use thiserror::Error;

/// The uniform failure envelope for the whole pipeline.
///
/// Each variant is created at the point of failure and carried unchanged to
/// the response boundary, which renders it using [`status_code`]. No stage
/// catches-and-continues; the only local recovery in the system is the
/// scanner's tolerance of malformed markup, which is policy, not failure.
///
/// [`status_code`]: ServiceError::status_code
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{0}")]
    BadRequest(String),
    #[error("Failed to fetch URL: {0}")]
    UpstreamFetchFailed(String),
    #[error("URL must point to an HTML page")]
    UnsupportedContentType,
    #[error("Model invocation failed: {0}")]
    ModelFailure(String),
    #[error("An internal error occurred: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    /// The HTTP status this failure renders as. Kept as a bare `u16` so the
    /// library stays independent of any web framework.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::MethodNotAllowed => 405,
            ServiceError::Unauthorized => 401,
            ServiceError::BadRequest(_) => 400,
            ServiceError::UpstreamFetchFailed(_) => 502,
            ServiceError::UnsupportedContentType => 400,
            ServiceError::ModelFailure(_) => 500,
            ServiceError::Internal(_) => 500,
        }
    }
}
