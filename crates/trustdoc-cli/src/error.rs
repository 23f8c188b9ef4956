//! Error types for the CLI application.

use thiserror::Error;
use trustdoc_citation::CitationError;
use trustdoc_processor::ProcessError;
use trustdoc_reconciler::ReconcileError;
use trustdoc_store::StoreError;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pipeline error
    #[error("{0}")]
    Process(#[from] ProcessError),

    /// Template could not be loaded
    #[error("Template error: {0}")]
    Template(#[from] ReconcileError),

    /// Citation policy rejected
    #[error("Citation policy error: {0}")]
    Citation(#[from] CitationError),

    /// Result store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CliError {
    /// Category reported in the `type` field of structured error output
    pub fn kind(&self) -> &'static str {
        match self {
            CliError::Process(e) => e.kind(),
            CliError::Config(_)
            | CliError::Template(_)
            | CliError::Citation(_)
            | CliError::Toml(_) => "configuration",
            CliError::Store(_) => "persistence",
            CliError::Io(_) => "io",
            CliError::Serialization(_) | CliError::InvalidInput(_) => "input",
        }
    }
}
