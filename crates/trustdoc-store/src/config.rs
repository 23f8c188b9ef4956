//! Configuration for result persistence

use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the result store
///
/// # Examples
///
/// ```
/// use trustdoc_store::StoreConfig;
///
/// let config = StoreConfig::default();
/// assert!(config.save_raw);
/// assert_eq!(config.max_name_chars, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory that receives `FORMATTED_` and `RAW_` artifacts
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Write the raw model payload next to the formatted result
    #[serde(default = "default_true")]
    pub save_raw: bool,

    /// Pretty-print JSON artifacts
    #[serde(default = "default_true")]
    pub pretty: bool,

    /// Longest sanitized filename kept in artifact names (chars)
    #[serde(default = "default_max_name_chars")]
    pub max_name_chars: usize,

    /// Sequence numbers tried before giving up on a name collision
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_true() -> bool {
    true
}

fn default_max_name_chars() -> usize {
    64
}

fn default_max_attempts() -> u32 {
    16
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            save_raw: true,
            pretty: true,
            max_name_chars: default_max_name_chars(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl StoreConfig {
    /// Default settings writing into `dir`
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: dir.into(),
            ..Self::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(StoreError::Config("output_dir is empty".to_string()));
        }
        if self.max_name_chars == 0 {
            return Err(StoreError::Config(
                "max_name_chars must be greater than 0".to_string(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(StoreError::Config(
                "max_attempts must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, StoreError> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| StoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, StoreError> {
        toml::to_string_pretty(self).map_err(|e| StoreError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(StoreConfig::default().validate().is_ok());
    }

    #[test]
    fn test_from_toml_fills_defaults() {
        let config = StoreConfig::from_toml(r#"output_dir = "/tmp/trustdoc""#).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("/tmp/trustdoc"));
        assert!(config.save_raw);
        assert_eq!(config.max_attempts, 16);
    }

    #[test]
    fn test_rejects_zero_attempts() {
        let config = StoreConfig {
            max_attempts: 0,
            ..StoreConfig::default()
        };
        assert!(matches!(config.validate(), Err(StoreError::Config(_))));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = StoreConfig::in_dir("results");
        let parsed = StoreConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}
