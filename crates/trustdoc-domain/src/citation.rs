//! Citations tying template values back to the source text

use serde::{Deserialize, Serialize};

/// Resolved position of a citation in the source text (chars)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Inclusive start offset
    pub start: usize,
    /// Exclusive end offset
    pub end: usize,
    /// `end - start`
    pub length: usize,
}

impl Location {
    /// Create a location from start and end offsets
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            length: end.saturating_sub(start),
        }
    }
}

/// A traceable piece of evidence behind a template value
///
/// `location` is absent when the text could not be found in the source
/// (typically because the model paraphrased it). Such citations are kept so a
/// viewer can still list them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    /// Cited text
    pub text: String,

    /// Class of the record this citation came from
    pub class: String,

    /// Where the text sits in the source, if it could be found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    /// Confidence in the citation
    pub confidence: f64,
}

/// A span a viewer should highlight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightSpan {
    /// Key the span was resolved from (`class` or `class#N`)
    pub key: String,
    /// Inclusive start offset (chars)
    pub start: usize,
    /// Exclusive end offset (chars)
    pub end: usize,
    /// Source text covered by the span
    pub text: String,
}
