pub mod gemini;
pub mod local;

use crate::errors::ServiceError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use serde_json::Value;
use std::fmt::Debug;

/// A trait for structured generation against an AI provider.
///
/// This defines a common interface for invoking a model with a response
/// constrained to a declared JSON schema. Which model is called, and how the
/// constraint is expressed on the wire, is configuration of the concrete
/// provider, not logic of the callers.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Performs a single generation attempt and returns the model's output
    /// parsed as JSON. No retries: a failure here surfaces immediately as
    /// [`ServiceError::ModelFailure`].
    async fn generate_structured(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        response_schema: &Value,
    ) -> Result<Value, ServiceError>;
}

dyn_clone::clone_trait_object!(AiProvider);
