//! # Prompt Templates
//!
//! The fixed persona prompt and the deterministic user-prompt rendering for
//! the summary generator. Process-wide constants, never mutated at runtime.

use crate::types::PageMetadata;

/// The system persona for structured page overviews.
pub const SUMMARY_SYSTEM_PROMPT: &str = "You can generate webpage overviews in structured format. A user will provide a page title and metadata. You will then generate an appropriate title for the page. You will also write a concise summary (max 250 words) based on the page description. You will also provide relevant single-word tags that categorize the page.";

/// Renders the extracted metadata as the user prompt: the page title
/// followed by a flattened `key: value; key: value` view of the tags in map
/// iteration order.
pub fn build_user_prompt(metadata: &PageMetadata) -> String {
    let tags = metadata
        .tags
        .iter()
        .map(|(key, value)| format!("{key}: {value}"))
        .collect::<Vec<_>>()
        .join("; ");
    format!(
        "I have a webpage with the following metadata: Title: {}; {}",
        metadata.title, tags
    )
}
