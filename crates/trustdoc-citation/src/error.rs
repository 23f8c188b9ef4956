//! Citation error types

use thiserror::Error;

/// Errors raised while configuring citation handling
///
/// Indexing and resolution themselves never fail: unlocatable text yields a
/// citation without location, unknown keys yield `None`.
#[derive(Error, Debug)]
pub enum CitationError {
    /// Policy values out of range
    #[error("Invalid citation policy: {0}")]
    InvalidPolicy(String),

    /// Policy could not be parsed
    #[error("Policy parse error: {0}")]
    Parse(String),
}
