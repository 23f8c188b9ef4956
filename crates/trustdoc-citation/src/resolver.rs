//! Citation key resolution
//!
//! A key is either a bare class (`trust_name`, the first citation of that
//! class) or `class#N` (the N-th citation of that class, 0-based).

use std::collections::HashMap;
use tracing::debug;
use trustdoc_domain::text::{char_len, char_slice, find_chars};
use trustdoc_domain::{Citation, HighlightSpan};

/// Split a key into class and index
///
/// Only a numeric suffix after the last `#` counts as an index, so classes
/// that themselves contain `#` still resolve.
pub fn parse_key(key: &str) -> (&str, usize) {
    if let Some((class, suffix)) = key.rsplit_once('#') {
        if let Ok(n) = suffix.parse::<usize>() {
            return (class, n);
        }
    }
    (key, 0)
}

/// Stable keys for every citation, in list order
pub fn citation_keys(citations: &[Citation]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    citations
        .iter()
        .map(|c| {
            let n = counts.entry(c.class.as_str()).or_insert(0);
            let key = format!("{}#{}", c.class, n);
            *n += 1;
            key
        })
        .collect()
}

/// Resolve a key to the span a viewer should highlight
///
/// The stored location is used when it covers the whole citation text and
/// lies inside the source. Otherwise the text is searched for again. Returns
/// `None` for unknown keys and for text that no longer appears in the source.
pub fn resolve(key: &str, citations: &[Citation], source_text: &str) -> Option<HighlightSpan> {
    let (class, n) = parse_key(key);
    let citation = citations.iter().filter(|c| c.class == class).nth(n)?;

    let (start, end) = locate(citation, source_text).or_else(|| {
        debug!("Citation '{}' not found in source", key);
        None
    })?;
    let text = char_slice(source_text, start, end)?.to_string();

    Some(HighlightSpan {
        key: key.to_string(),
        start,
        end,
        text,
    })
}

/// Resolve every citation, skipping those that cannot be located
pub fn resolve_all(citations: &[Citation], source_text: &str) -> Vec<HighlightSpan> {
    citation_keys(citations)
        .iter()
        .filter_map(|key| resolve(key, citations, source_text))
        .collect()
}

fn locate(citation: &Citation, source_text: &str) -> Option<(usize, usize)> {
    if let Some(loc) = citation.location {
        if char_len(&citation.text) <= loc.length
            && char_slice(source_text, loc.start, loc.end).is_some()
        {
            return Some((loc.start, loc.end));
        }
    }
    find_chars(source_text, &citation.text)
        .or_else(|| find_chars(source_text, citation.text.trim()))
}
