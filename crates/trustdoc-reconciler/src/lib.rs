//! TrustDoc Reconciler
//!
//! Turns an unordered bag of extraction records into the fixed, fully
//! populated output template.
//!
//! # Architecture
//!
//! ```text
//! model payload → normalize → ExtractionRecord[] → Reconciler(TemplateShape) → Template
//! ```
//!
//! # Field kinds
//!
//! - **singleton**: first matching record
//! - **list**: every matching record, `[]` when none
//! - **narrative**: all matching records joined, each tagged `[class]`
//! - **presence**: `"yes"` when anything matched, otherwise `"unknown"`
//! - **object**: nested fields, `{}` when it declares none
//!
//! # Example Usage
//!
//! ```
//! use trustdoc_domain::{ExtractionRecord, FieldValue};
//! use trustdoc_reconciler::Reconciler;
//!
//! let reconciler = Reconciler::trust_default();
//! let records = vec![ExtractionRecord::new("trust_name", "THE DOE TRUST")];
//!
//! let template = reconciler.reconcile(&records);
//! let name = template.get("Basic_Information", "Trust_Name").and_then(FieldValue::as_text);
//! assert_eq!(name, Some("THE DOE TRUST"));
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod matcher;
mod normalize;
mod reconciler;
mod shape;


pub use config::ReconcilerConfig;
pub use error::ReconcileError;
pub use matcher::ClassMatcher;
pub use normalize::{
    normalize_payload, parse_payload, payload_json, NormalizedPayload, RejectedEntry,
};
pub use reconciler::{reconcile, ReconcileReport, Reconciler, Reconciliation};
pub use shape::{derive_class_name, FieldKind, FieldShape, SectionShape, TemplateShape};
