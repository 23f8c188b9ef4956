//! Extraction records produced by the external model

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Confidence assumed for a record that carries no score of its own
pub const DEFAULT_CONFIDENCE: f64 = 1.0;

/// Character offsets of an extraction inside the source text
///
/// `start` is inclusive, `end` exclusive. Model-reported spans are hints:
/// they may be stale and are re-checked before they are trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Inclusive start offset (chars)
    pub start: usize,
    /// Exclusive end offset (chars)
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of chars covered, zero for inverted spans
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// True when the span covers nothing
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One fact extracted from a document
///
/// `class` is a free-form label agreed with the prompt (e.g. `trust_name`).
/// Several records may share a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    /// Semantic label of the extraction
    pub class: String,

    /// Extracted text, not necessarily verbatim
    pub text: String,

    /// Position in the source text as reported by the model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,

    /// Auxiliary metadata attached by the model
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Value>,

    /// Model confidence, treated as 1.0 when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl ExtractionRecord {
    /// Create a record with no span, attributes or confidence
    pub fn new(class: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            text: text.into(),
            span: None,
            attributes: BTreeMap::new(),
            confidence: None,
        }
    }

    /// Attach a model-reported span
    pub fn with_span(mut self, start: usize, end: usize) -> Self {
        self.span = Some(Span::new(start, end));
        self
    }

    /// Attach a confidence score
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Attach an attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Effective confidence, clamped to [0.0, 1.0]
    pub fn confidence(&self) -> f64 {
        match self.confidence {
            Some(c) if c.is_finite() => c.clamp(0.0, 1.0),
            _ => DEFAULT_CONFIDENCE,
        }
    }

    /// Check that the record carries the fields every consumer relies on
    pub fn validate(&self) -> Result<(), String> {
        if self.class.trim().is_empty() {
            return Err("class is empty".to_string());
        }
        if self.text.trim().is_empty() {
            return Err(format!("text is empty for class '{}'", self.class));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_defaults_to_one() {
        let record = ExtractionRecord::new("trust_name", "THE SMITH TRUST");
        assert_eq!(record.confidence(), 1.0);
    }

    #[test]
    fn test_confidence_is_clamped() {
        let record = ExtractionRecord::new("trust_name", "x").with_confidence(1.7);
        assert_eq!(record.confidence(), 1.0);

        let record = ExtractionRecord::new("trust_name", "x").with_confidence(f64::NAN);
        assert_eq!(record.confidence(), 1.0);
    }

    #[test]
    fn test_validate_rejects_blank_text() {
        let record = ExtractionRecord::new("trust_name", "   ");
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_class() {
        let record = ExtractionRecord::new("", "THE SMITH TRUST");
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_deserialize_minimal_record() {
        let record: ExtractionRecord =
            serde_json::from_str(r#"{"class": "trust_date", "text": "May 30, 2012"}"#).unwrap();
        assert_eq!(record.class, "trust_date");
        assert!(record.span.is_none());
        assert!(record.attributes.is_empty());
    }

    #[test]
    fn test_inverted_span_has_zero_len() {
        let span = Span::new(10, 4);
        assert_eq!(span.len(), 0);
        assert!(span.is_empty());
    }
}
