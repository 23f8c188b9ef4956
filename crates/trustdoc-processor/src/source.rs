//! Record sources
//!
//! [`PayloadSource`] serves a model payload that was produced elsewhere (an
//! uploaded extraction file, a request body). [`MockSource`] answers with a
//! fixed response string for deterministic tests.

use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use trustdoc_domain::{RecordSource, SourceOutput};
use trustdoc_reconciler::{normalize_payload, payload_json, ReconcileError};

/// Errors produced by the bundled sources
#[derive(Error, Debug)]
pub enum SourceError {
    /// Payload could not be turned into records
    #[error("Invalid payload: {0}")]
    Payload(#[from] ReconcileError),

    /// Source is configured to fail
    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

/// Serves records from an already-available model payload
#[derive(Debug, Clone)]
pub struct PayloadSource {
    name: String,
    payload: Value,
    free_text: Vec<String>,
}

impl PayloadSource {
    /// Source over a parsed payload
    pub fn new(name: impl Into<String>, payload: Value) -> Self {
        Self {
            name: name.into(),
            payload,
            free_text: Vec::new(),
        }
    }

    /// Source over a model response string, which may be fenced in markdown
    pub fn parse(name: impl Into<String>, response: &str) -> Result<Self, SourceError> {
        Ok(Self::new(name, payload_json(response)?))
    }

    /// Attach prose produced alongside the payload
    pub fn with_free_text(mut self, free_text: Vec<String>) -> Self {
        self.free_text = free_text;
        self
    }
}

impl RecordSource for PayloadSource {
    type Error = SourceError;

    fn name(&self) -> &str {
        &self.name
    }

    fn extract(&self, _document_text: &str) -> Result<SourceOutput, Self::Error> {
        let normalized = normalize_payload(&self.payload)?;
        debug!(
            "Payload source '{}': {} records, {} rejected",
            self.name,
            normalized.records.len(),
            normalized.rejected.len()
        );
        Ok(SourceOutput {
            records: normalized.records,
            raw: Some(self.payload.clone()),
            free_text: self.free_text.clone(),
        })
    }
}

/// Mock source for deterministic testing
///
/// Returns the same response for every document without any network call.
///
/// # Examples
///
/// ```
/// use trustdoc_domain::RecordSource;
/// use trustdoc_processor::MockSource;
///
/// let source = MockSource::new(r#"[{"class": "trust_name", "text": "THE DOE TRUST"}]"#);
/// let output = source.extract("THE DOE TRUST").unwrap();
/// assert_eq!(output.records.len(), 1);
/// assert_eq!(source.call_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockSource {
    response: Result<String, String>,
    free_text: Vec<String>,
    call_count: Arc<AtomicUsize>,
}

impl MockSource {
    /// Mock answering with a fixed model response
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: Ok(response.into()),
            free_text: Vec::new(),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Mock that fails every call with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            response: Err(message.into()),
            free_text: Vec::new(),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Attach prose returned with every response
    pub fn with_free_text(mut self, free_text: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.free_text = free_text.into_iter().map(Into::into).collect();
        self
    }

    /// Number of times extract was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

impl RecordSource for MockSource {
    type Error = SourceError;

    fn name(&self) -> &str {
        "mock"
    }

    fn extract(&self, _document_text: &str) -> Result<SourceOutput, Self::Error> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        let response = self
            .response
            .as_ref()
            .map_err(|message| SourceError::Unavailable(message.clone()))?;
        let raw = payload_json(response)?;
        let normalized = normalize_payload(&raw)?;

        Ok(SourceOutput {
            records: normalized.records,
            raw: Some(raw),
            free_text: self.free_text.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_source_normalizes_langextract_shape() {
        let payload = json!({
            "extractions": [
                {
                    "extraction_class": "trust_name",
                    "extraction_text": "THE DOE TRUST",
                    "char_interval": {"start_pos": 0, "end_pos": 13}
                },
                {"extraction_class": "trustee"}
            ]
        });
        let source = PayloadSource::new("upload", payload.clone());
        let output = source.extract("THE DOE TRUST").unwrap();

        assert_eq!(output.records.len(), 1);
        assert_eq!(output.records[0].class, "trust_name");
        assert_eq!(output.raw, Some(payload));
    }

    #[test]
    fn test_payload_source_rejects_scalar_payload() {
        let source = PayloadSource::new("upload", json!(42));
        assert!(matches!(source.extract(""), Err(SourceError::Payload(_))));
    }

    #[test]
    fn test_mock_source_handles_code_fence() {
        let source = MockSource::new("```json\n[{\"class\": \"grantor\", \"text\": \"JANE DOE\"}]\n```");
        let output = source.extract("JANE DOE").unwrap();
        assert_eq!(output.records[0].text, "JANE DOE");
        assert!(output.raw.unwrap().is_array());
    }

    #[test]
    fn test_payload_source_parse_rejects_prose() {
        assert!(PayloadSource::parse("upload", "no JSON here").is_err());
    }

    #[test]
    fn test_failing_mock_counts_calls() {
        let source = MockSource::failing("quota exceeded");
        assert!(matches!(source.extract("x"), Err(SourceError::Unavailable(_))));
        assert!(source.extract("x").is_err());
        assert_eq!(source.call_count(), 2);
    }
}
