//! Error types for the processing pipeline

use thiserror::Error;
use trustdoc_citation::CitationError;
use trustdoc_reconciler::ReconcileError;
use trustdoc_store::{ProcessingResult, StoreError};

/// Errors that can occur while processing a document
#[derive(Error, Debug)]
pub enum ProcessError {
    /// Document text is empty or whitespace
    #[error("No document text provided")]
    EmptyDocument,

    /// Document exceeds the configured limit
    #[error("Document too long: {0} chars (max: {1})")]
    DocumentTooLong(usize, usize),

    /// Invalid processor configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Template or reconciler configuration rejected
    #[error("Template error: {0}")]
    Template(#[from] ReconcileError),

    /// Citation policy rejected
    #[error("Citation policy error: {0}")]
    Citation(#[from] CitationError),

    /// The record source failed
    #[error("Extraction source '{source_name}' failed: {message}")]
    Source {
        /// Name reported by the source
        source_name: String,
        /// Source error message
        message: String,
    },

    /// The result was built but could not be written
    ///
    /// The complete result is carried so the caller can still return it.
    #[error("Failed to persist result: {error}")]
    Persist {
        /// Underlying store error
        #[source]
        error: StoreError,
        /// The result that failed to persist
        result: Box<ProcessingResult>,
    },

    /// Blocking task failed to complete
    #[error("Task join error: {0}")]
    Join(String),
}

impl ProcessError {
    /// Short machine-readable category for structured error output
    pub fn kind(&self) -> &'static str {
        match self {
            ProcessError::EmptyDocument | ProcessError::DocumentTooLong(..) => "input",
            ProcessError::Config(_) | ProcessError::Template(_) | ProcessError::Citation(_) => {
                "configuration"
            }
            ProcessError::Source { .. } => "upstream",
            ProcessError::Persist { .. } => "persistence",
            ProcessError::Join(_) => "internal",
        }
    }

    /// The assembled result, if processing got that far
    pub fn result(&self) -> Option<&ProcessingResult> {
        match self {
            ProcessError::Persist { result, .. } => Some(result.as_ref()),
            _ => None,
        }
    }

    /// Take the assembled result, if processing got that far
    pub fn into_result(self) -> Option<ProcessingResult> {
        match self {
            ProcessError::Persist { result, .. } => Some(*result),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_message() {
        assert_eq!(ProcessError::EmptyDocument.to_string(), "No document text provided");
        assert_eq!(ProcessError::EmptyDocument.kind(), "input");
    }

    #[test]
    fn test_kinds() {
        let upstream = ProcessError::Source {
            source_name: "mock".to_string(),
            message: "down".to_string(),
        };
        assert_eq!(upstream.kind(), "upstream");
        assert_eq!(
            ProcessError::Template(ReconcileError::InvalidTemplate("x".to_string())).kind(),
            "configuration"
        );
        assert!(upstream.into_result().is_none());
    }
}
