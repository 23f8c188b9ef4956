//! Error types for the Reconciler

use thiserror::Error;

/// Errors that can occur while configuring or feeding the reconciler
///
/// Individual bad records never produce an error; they are skipped and
/// logged. Only configuration and whole-payload problems surface here.
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// Template definition could not be parsed
    #[error("Template parse error: {0}")]
    TemplateParse(String),

    /// Template definition parsed but is structurally invalid
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    /// Reconciler configuration or fill policy is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Model payload has an unusable overall shape
    #[error("Invalid payload format: {0}")]
    InvalidFormat(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Template or config file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ReconcileError {
    fn from(e: serde_json::Error) -> Self {
        ReconcileError::JsonParse(e.to_string())
    }
}
