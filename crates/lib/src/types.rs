use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata recovered from a single parse pass over a page.
///
/// Produced once per request by the extractor and consumed read-only by the
/// summary generator; nothing is shared across requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    /// Accumulated `<title>` text. May be empty.
    pub title: String,
    /// Allow-listed `<meta>` key/value pairs, keys unique with
    /// last-write-wins. `BTreeMap` keeps prompt rendering deterministic.
    pub tags: BTreeMap<String, String>,
}

/// A schema-validated summary produced by the model.
///
/// Only constructed after the model output has passed explicit shape
/// validation; the 250-word summary limit is an instruction to the model,
/// not enforced here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StructuredSummary {
    pub title: String,
    pub summary: String,
    pub tags: Vec<String>,
}
