//! Configuration for the processing pipeline

use serde::{Deserialize, Serialize};

/// Configuration for the Processor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Maximum document length (chars); longer input is rejected up front
    pub max_document_chars: usize,

    /// Scan source-provided prose for quoted citations
    pub scan_quotes: bool,
}

impl Default for ProcessorConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            max_document_chars: 500_000,
            scan_quotes: true,
        }
    }
}

impl ProcessorConfig {
    /// Strict preset: smaller documents, record citations only
    pub fn strict() -> Self {
        Self {
            max_document_chars: 100_000,
            scan_quotes: false,
        }
    }

    /// Lenient preset: very large documents
    pub fn lenient() -> Self {
        Self {
            max_document_chars: 2_000_000,
            scan_quotes: true,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_document_chars == 0 {
            return Err("max_document_chars must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
