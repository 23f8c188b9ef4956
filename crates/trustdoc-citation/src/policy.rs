//! Citation policy
//!
//! Confidence values here are conventions, not calibrated scores. They are
//! kept configurable so deployments can tune them.

use crate::error::CitationError;
use serde::{Deserialize, Serialize};

/// Configuration for citation indexing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CitationPolicy {
    /// Confidence for records that carry no score of their own
    pub native_confidence: f64,

    /// Confidence for citations found only by quote scanning
    pub recovered_confidence: f64,

    /// Minimum chars for a generic quoted string to count as a citation
    pub min_quote_chars: usize,

    /// Class assigned to quote-scanned citations
    pub quote_class: String,

    /// Use model spans when they check out; when false, always search
    pub trust_stored_spans: bool,
}

impl Default for CitationPolicy {
    fn default() -> Self {
        Self {
            native_confidence: 1.0,
            recovered_confidence: 0.9,
            min_quote_chars: 10,
            quote_class: "quoted_text".to_string(),
            trust_stored_spans: true,
        }
    }
}

impl CitationPolicy {
    /// Strict policy: long quotes only, lower trust in recovered spans,
    /// every location re-derived from the source
    pub fn strict() -> Self {
        Self {
            native_confidence: 1.0,
            recovered_confidence: 0.75,
            min_quote_chars: 25,
            quote_class: "quoted_text".to_string(),
            trust_stored_spans: false,
        }
    }

    /// Permissive policy: short quotes accepted
    pub fn permissive() -> Self {
        Self {
            min_quote_chars: 3,
            ..Self::default()
        }
    }

    /// Validate the policy
    pub fn validate(&self) -> Result<(), CitationError> {
        for (name, value) in [
            ("native_confidence", self.native_confidence),
            ("recovered_confidence", self.recovered_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(CitationError::InvalidPolicy(format!(
                    "{} {} out of range [0.0, 1.0]",
                    name, value
                )));
            }
        }
        if self.min_quote_chars == 0 {
            return Err(CitationError::InvalidPolicy(
                "min_quote_chars must be greater than 0".to_string(),
            ));
        }
        if self.quote_class.trim().is_empty() {
            return Err(CitationError::InvalidPolicy("quote_class is empty".to_string()));
        }
        Ok(())
    }

    /// Load a policy from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, CitationError> {
        let policy: Self =
            toml::from_str(toml_str).map_err(|e| CitationError::Parse(e.to_string()))?;
        policy.validate()?;
        Ok(policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = CitationPolicy::default();
        assert_eq!(policy.native_confidence, 1.0);
        assert_eq!(policy.recovered_confidence, 0.9);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(CitationPolicy::strict().validate().is_ok());
        assert!(CitationPolicy::permissive().validate().is_ok());
        assert!(!CitationPolicy::strict().trust_stored_spans);
    }

    #[test]
    fn test_out_of_range_confidence() {
        let mut policy = CitationPolicy::default();
        policy.recovered_confidence = 1.5;
        assert!(matches!(policy.validate(), Err(CitationError::InvalidPolicy(_))));
    }

    #[test]
    fn test_from_toml() {
        let policy = CitationPolicy::from_toml(
            r#"
            native_confidence = 0.95
            recovered_confidence = 0.8
            min_quote_chars = 12
            quote_class = "quote"
            "#,
        )
        .unwrap();
        assert_eq!(policy.recovered_confidence, 0.8);
        assert!(policy.trust_stored_spans);
    }

    #[test]
    fn test_from_toml_partial() {
        let policy = CitationPolicy::from_toml("min_quote_chars = 4").unwrap();
        assert_eq!(policy.min_quote_chars, 4);
        assert_eq!(policy.quote_class, "quoted_text");
    }

    #[test]
    fn test_from_toml_rejects_bad_values() {
        let result = CitationPolicy::from_toml(
            r#"
            native_confidence = 2.0
            recovered_confidence = 0.8
            min_quote_chars = 12
            quote_class = "quote"
            "#,
        );
        assert!(result.is_err());
    }
}
