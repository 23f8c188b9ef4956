//! Request and outcome types for the Processor

use serde::{Deserialize, Serialize};
use trustdoc_reconciler::ReconcileReport;
use trustdoc_store::{PersistedPaths, ProcessingResult};

/// One document to process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRequest {
    /// Full source text
    pub document_text: String,

    /// Name the document was uploaded under
    #[serde(default = "default_filename")]
    pub filename: String,
}

fn default_filename() -> String {
    "document.txt".to_string()
}

impl ProcessRequest {
    /// Request for `document_text` uploaded as `filename`
    pub fn new(document_text: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            document_text: document_text.into(),
            filename: filename.into(),
        }
    }
}

/// Everything produced for one document
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    /// The assembled result
    pub result: ProcessingResult,

    /// What the reconciler did with the records
    pub report: ReconcileReport,

    /// Records the source returned, before validation and de-duplication
    pub records_received: usize,

    /// Artifact paths, when a store is attached
    pub persisted: Option<PersistedPaths>,
}
