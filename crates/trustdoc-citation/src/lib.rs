//! TrustDoc Citations
//!
//! Builds the citation index for a processed document and resolves citation
//! keys back to highlightable spans.
//!
//! # Overview
//!
//! - [`CitationIndexer`]: records + source text → ordered, de-duplicated citations
//! - [`scan_quotes`]: secondary recovery of quoted text from free prose
//! - [`resolve`]: `class` / `class#N` key → [`HighlightSpan`](trustdoc_domain::HighlightSpan)
//!
//! All offsets are char offsets into the source text.

#![warn(missing_docs)]

pub mod error;
pub mod indexer;
pub mod policy;
pub mod quotes;
pub mod resolver;

pub use error::CitationError;
pub use indexer::{index, CitationIndexer};
pub use policy::CitationPolicy;
pub use quotes::{scan_quotes, QuotedSpan};
pub use resolver::{citation_keys, parse_key, resolve, resolve_all};
