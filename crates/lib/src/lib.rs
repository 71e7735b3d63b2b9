//! # glimpse
//!
//! The core of a single-request page-overview service: fetch a URL, recover
//! the `<title>` text and a fixed set of `<meta>` pairs from the HTML byte
//! stream without building a DOM, and turn the result into a
//! schema-validated AI summary. Everything request-scoped, nothing cached,
//! no retries.
//!
//! The HTTP boundary (routing, bearer auth, error rendering) lives in the
//! `glimpse-server` crate; this crate exposes the three operations it
//! composes: [`extract_metadata`], [`fetch_and_extract`], and
//! [`generate_structured_summary`].

pub mod errors;
pub mod fetch;
pub mod metadata;
pub mod prompts;
pub mod providers;
pub mod scanner;
pub mod summary;
pub mod types;

pub use errors::ServiceError;
pub use fetch::fetch_and_extract;
pub use metadata::{extract_metadata, extract_metadata_chunks, ALLOWED_META_KEYS};
pub use summary::generate_structured_summary;
pub use types::{PageMetadata, StructuredSummary};
