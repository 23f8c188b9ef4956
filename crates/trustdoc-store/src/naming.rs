//! Artifact file naming
//!
//! A result for `My Trust.txt` processed at 2026-10-18 09:15:02.123 UTC with
//! sequence 7 is written as
//! `FORMATTED_20261018T091502123Z_000007_My_Trust.json`, and its raw payload
//! as `RAW_20261018T091502123Z_000007_My_Trust.json`.

use chrono::{DateTime, Utc};

/// Prefix of the formatted result artifact
pub const FORMATTED_PREFIX: &str = "FORMATTED_";

/// Prefix of the raw payload artifact
pub const RAW_PREFIX: &str = "RAW_";

const FALLBACK_NAME: &str = "document";

/// Reduce an uploaded filename to a safe artifact name component
///
/// Drops any directory part and the last extension, replaces everything
/// outside `[A-Za-z0-9_-]` with `_`, and caps the length at `max_chars`.
pub fn sanitize_filename(original: &str, max_chars: usize) -> String {
    let file = original.rsplit(['/', '\\']).next().unwrap_or(original);
    let stem = match file.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file,
    };

    let cleaned: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(max_chars)
        .collect();

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Shared base name for one result's artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactName {
    base: String,
}

impl ArtifactName {
    /// Base from timestamp, sequence number and sanitized name
    pub fn new(timestamp: DateTime<Utc>, seq: u64, sanitized: &str) -> Self {
        Self {
            base: format!(
                "{}_{:06}_{}",
                timestamp.format("%Y%m%dT%H%M%S%3fZ"),
                seq,
                sanitized
            ),
        }
    }

    /// The shared base, without prefix or extension
    pub fn base(&self) -> &str {
        &self.base
    }

    /// File name of the formatted result
    pub fn formatted(&self) -> String {
        format!("{}{}.json", FORMATTED_PREFIX, self.base)
    }

    /// File name of the raw payload
    pub fn raw(&self) -> String {
        format!("{}{}.json", RAW_PREFIX, self.base)
    }
}
