//! TrustDoc Domain Layer
//!
//! Core value types shared by every stage of the document pipeline. This crate
//! holds no I/O and no policy; it only defines what the pipeline passes around.
//!
//! ## Key Concepts
//!
//! - **Extraction Record**: one (class, text, span) fact produced by the model
//! - **Template**: the fixed three-section output structure
//! - **Citation**: a pointer from a template value back into the source text
//! - **Fill Policy**: placeholders used when nothing matched a field
//! - **Record Source**: the boundary to whatever produced the records
//!
//! ## Offsets
//!
//! Every offset in this crate counts Unicode scalar values, not bytes. The
//! helpers in [`text`] convert between the two.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod citation;
pub mod fill;
pub mod record;
pub mod template;
pub mod text;
pub mod traits;

// Re-exports for convenience
pub use citation::{Citation, HighlightSpan, Location};
pub use fill::FillPolicy;
pub use record::{ExtractionRecord, Span};
pub use template::{FieldValue, Presence, PresenceField, Template};
pub use traits::{RecordSource, SourceOutput};
