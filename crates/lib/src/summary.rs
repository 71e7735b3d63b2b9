//! # Summary Generator
//!
//! Turns a [`PageMetadata`] into a schema-validated [`StructuredSummary`]
//! through a single structured-generation call. The model output is
//! untrusted: every field is checked explicitly for presence and type before
//! a summary is returned, and any mismatch is a
//! [`ServiceError::ModelFailure`].

use crate::errors::ServiceError;
use crate::prompts::{build_user_prompt, SUMMARY_SYSTEM_PROMPT};
use crate::providers::ai::AiProvider;
use crate::types::{PageMetadata, StructuredSummary};
use serde_json::{json, Value};
use tracing::debug;

/// The fixed schema every model response must conform to. The 250-word
/// summary target lives in the system prompt; the schema only constrains
/// shape.
pub fn response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "title": { "type": "string" },
            "summary": { "type": "string" },
            "tags": {
                "type": "array",
                "items": { "type": "string" },
            },
        },
        "required": ["title", "summary", "tags"],
    })
}

/// Generates a structured summary for the given page metadata.
///
/// One invocation attempt, no retries: an invocation error or a
/// non-conforming response surfaces immediately as `ModelFailure`.
pub async fn generate_structured_summary(
    provider: &dyn AiProvider,
    metadata: &PageMetadata,
) -> Result<StructuredSummary, ServiceError> {
    let user_prompt = build_user_prompt(metadata);
    debug!(%user_prompt, "invoking structured generation");
    let raw = provider
        .generate_structured(SUMMARY_SYSTEM_PROMPT, &user_prompt, &response_schema())
        .await?;
    validate_summary(&raw)
}

/// Checks the model output against the response schema field by field.
fn validate_summary(value: &Value) -> Result<StructuredSummary, ServiceError> {
    let object = value
        .as_object()
        .ok_or_else(|| ServiceError::ModelFailure("output is not a JSON object".to_string()))?;
    let title = require_string(object, "title")?;
    let summary = require_string(object, "summary")?;
    let tags = object
        .get("tags")
        .ok_or_else(|| ServiceError::ModelFailure("missing required field `tags`".to_string()))?
        .as_array()
        .ok_or_else(|| ServiceError::ModelFailure("`tags` is not an array".to_string()))?
        .iter()
        .map(|tag| {
            tag.as_str().map(str::to_string).ok_or_else(|| {
                ServiceError::ModelFailure("`tags` contains a non-string entry".to_string())
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(StructuredSummary {
        title,
        summary,
        tags,
    })
}

fn require_string(
    object: &serde_json::Map<String, Value>,
    field: &str,
) -> Result<String, ServiceError> {
    object
        .get(field)
        .ok_or_else(|| ServiceError::ModelFailure(format!("missing required field `{field}`")))?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ServiceError::ModelFailure(format!("`{field}` is not a string")))
}
