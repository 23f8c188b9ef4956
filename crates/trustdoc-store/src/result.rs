//! Processing result assembly

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use trustdoc_domain::{Citation, Template};
use uuid::Uuid;

/// Facts about one processing run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultMetadata {
    /// When the result was assembled (RFC 3339, UTC)
    pub processed_date: DateTime<Utc>,

    /// Name of the uploaded file, as given by the caller
    pub original_filename: String,

    /// Wall time from request to assembly
    pub processing_time_ms: u64,

    /// Unique id of this run
    pub run_id: Uuid,
}

impl ResultMetadata {
    /// Metadata stamped with the current time and a fresh run id
    pub fn new(original_filename: impl Into<String>, processing_time: Duration) -> Self {
        Self {
            processed_date: Utc::now(),
            original_filename: original_filename.into(),
            processing_time_ms: u64::try_from(processing_time.as_millis()).unwrap_or(u64::MAX),
            run_id: Uuid::now_v7(),
        }
    }
}

/// The persisted outcome of processing one document
///
/// Built once by [`assemble`] and not modified afterwards. The raw model
/// payload is never part of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    /// Run metadata
    pub metadata: ResultMetadata,

    /// The reconciled template
    pub extraction: Template,

    /// Citation index for the template values
    pub citations: Vec<Citation>,
}

/// Wrap a template and its citations into a result
pub fn assemble(
    template: Template,
    citations: Vec<Citation>,
    metadata: ResultMetadata,
) -> ProcessingResult {
    debug!(
        "Assembled result {} for '{}' with {} citations",
        metadata.run_id,
        metadata.original_filename,
        citations.len()
    );
    ProcessingResult {
        metadata,
        extraction: template,
        citations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trustdoc_domain::Location;

    fn sample() -> ProcessingResult {
        assemble(
            Template::new(),
            vec![Citation {
                text: "May 30, 2012".to_string(),
                class: "trust_date".to_string(),
                location: Some(Location::new(31, 43)),
                confidence: 1.0,
            }],
            ResultMetadata::new("trust.txt", Duration::from_millis(1250)),
        )
    }

    #[test]
    fn test_metadata_new() {
        let meta = ResultMetadata::new("trust.txt", Duration::from_millis(1250));
        assert_eq!(meta.processing_time_ms, 1250);
        assert_eq!(meta.original_filename, "trust.txt");
        assert_ne!(meta.run_id, ResultMetadata::new("x", Duration::ZERO).run_id);
    }

    #[test]
    fn test_result_json_keys() {
        let json = serde_json::to_value(sample()).unwrap();
        let obj = json.as_object().unwrap();
        let mut keys: Vec<_> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["citations", "extraction", "metadata"]);
        assert!(json["metadata"]["processed_date"].is_string());
        assert_eq!(json["citations"][0]["location"]["length"], 12);
    }

    #[test]
    fn test_result_json_roundtrip() {
        let result = sample();
        let json = serde_json::to_string(&result).unwrap();
        let back: ProcessingResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
