//! Configuration for the Reconciler

use crate::error::ReconcileError;
use serde::{Deserialize, Serialize};
use trustdoc_domain::FillPolicy;

/// Configuration for the Reconciler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// Maximum chars kept from a single record in a narrative field
    #[serde(default = "default_max_fragment_chars")]
    pub max_fragment_chars: usize,

    /// Appended to a narrative fragment that was truncated
    #[serde(default = "default_ellipsis")]
    pub ellipsis: String,

    /// Placeholders for unmatched fields
    #[serde(default, alias = "fill_missing")]
    pub fill: FillPolicy,
}

fn default_max_fragment_chars() -> usize {
    1000
}

fn default_ellipsis() -> String {
    "...".to_string()
}

impl ReconcilerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_fragment_chars == 0 {
            return Err("max_fragment_chars must be greater than 0".to_string());
        }
        self.fill.validate()
    }
}

impl Default for ReconcilerConfig {
    /// Default configuration: 1000-char fragments, "Not specified" fill
    fn default() -> Self {
        Self {
            max_fragment_chars: default_max_fragment_chars(),
            ellipsis: default_ellipsis(),
            fill: FillPolicy::default(),
        }
    }
}

impl ReconcilerConfig {
    /// Compact preset: short narrative fragments for summary views
    pub fn compact() -> Self {
        Self {
            max_fragment_chars: 300,
            ..Self::default()
        }
    }

    /// Verbose preset: long fragments for full-text review
    pub fn verbose() -> Self {
        Self {
            max_fragment_chars: 5000,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ReconcileError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| ReconcileError::Config(format!("Failed to parse TOML: {}", e)))?;
        config.validate().map_err(ReconcileError::Config)?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ReconcileError> {
        toml::to_string_pretty(self)
            .map_err(|e| ReconcileError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ReconcilerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_fragment_chars, 1000);
        assert_eq!(config.ellipsis, "...");
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(ReconcilerConfig::compact().validate().is_ok());
        assert!(ReconcilerConfig::verbose().validate().is_ok());
    }

    #[test]
    fn test_zero_fragment_length_is_invalid() {
        let mut config = ReconcilerConfig::default();
        config.max_fragment_chars = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_fill_value_is_invalid() {
        let mut config = ReconcilerConfig::default();
        config.fill.scalar_default = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ReconcilerConfig::compact();
        let toml_str = config.to_toml().unwrap();
        let parsed = ReconcilerConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_from_toml_with_partial_fill() {
        let parsed = ReconcilerConfig::from_toml(
            r#"
            max_fragment_chars = 200

            [fill]
            scalar_default = "N/A"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.max_fragment_chars, 200);
        assert_eq!(parsed.fill.scalar_default, "N/A");
        assert!(parsed.fill.enabled);
    }

    #[test]
    fn test_fill_missing_alias() {
        let parsed = ReconcilerConfig::from_toml(
            r#"
            [fill_missing]
            enabled = false
            "#,
        )
        .unwrap();
        assert!(!parsed.fill.enabled);
        assert_eq!(parsed.max_fragment_chars, 1000);
    }

    #[test]
    fn test_from_toml_rejects_invalid_values() {
        let result = ReconcilerConfig::from_toml("max_fragment_chars = 0");
        assert!(matches!(result, Err(ReconcileError::Config(_))));
    }
}
