//! Trait definitions for external interactions
//!
//! The pipeline never talks to a model directly. Whatever produces records
//! (a hosted extraction model, a hybrid two-model setup, a fixture file)
//! implements [`RecordSource`].

use crate::record::ExtractionRecord;
use serde_json::Value;

/// Everything a source hands back for one document
#[derive(Debug, Clone, Default)]
pub struct SourceOutput {
    /// Normalized records, in model emission order
    pub records: Vec<ExtractionRecord>,

    /// Untouched model payload, kept for auditing
    pub raw: Option<Value>,

    /// Prose returned alongside the records, scanned for quoted citations
    pub free_text: Vec<String>,
}

impl SourceOutput {
    /// Output with records only
    pub fn from_records(records: Vec<ExtractionRecord>) -> Self {
        Self {
            records,
            raw: None,
            free_text: Vec::new(),
        }
    }
}

/// Trait for producing extraction records from a document
///
/// Implementations own their retry and timeout policy. A returned `Ok` is
/// assumed complete; there is no partial or streamed output.
pub trait RecordSource {
    /// Error type for source operations
    type Error;

    /// Human-readable source name, recorded in logs
    fn name(&self) -> &str;

    /// Produce records for the given document text
    fn extract(&self, document_text: &str) -> Result<SourceOutput, Self::Error>;
}
