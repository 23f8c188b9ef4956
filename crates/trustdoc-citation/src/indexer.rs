//! Citation indexing
//!
//! Every usable record becomes at most one citation. Stored model spans are
//! checked against the source and re-derived by substring search when they
//! do not line up. Records whose text cannot be found are kept without a
//! location.

use crate::error::CitationError;
use crate::policy::CitationPolicy;
use crate::quotes::scan_quotes;
use std::collections::HashSet;
use tracing::{debug, info, warn};
use trustdoc_domain::text::{char_slice, find_chars};
use trustdoc_domain::{Citation, ExtractionRecord, Location};

/// Index records with the default policy
pub fn index(records: &[ExtractionRecord], source_text: &str) -> Vec<Citation> {
    CitationIndexer::default().index(records, source_text)
}

/// Builds citation lists from extraction records
#[derive(Debug, Clone, Default)]
pub struct CitationIndexer {
    policy: CitationPolicy,
}

impl CitationIndexer {
    /// Create an indexer, rejecting invalid policies
    pub fn new(policy: CitationPolicy) -> Result<Self, CitationError> {
        policy.validate()?;
        Ok(Self { policy })
    }

    /// The policy in use
    pub fn policy(&self) -> &CitationPolicy {
        &self.policy
    }

    /// Build citations from records
    pub fn index(&self, records: &[ExtractionRecord], source_text: &str) -> Vec<Citation> {
        let mut seen = HashSet::new();
        let mut citations = self.record_citations(records, source_text, &mut seen);
        sort_by_location(&mut citations);
        log_summary(&citations);
        citations
    }

    /// Build citations from records plus quotes found in free text
    ///
    /// `free_texts` is prose produced alongside the records (for example a
    /// secondary model's summary). Quotes that duplicate a record's text are
    /// dropped; quotes that cannot be found in the source are dropped too,
    /// since nothing but the quote itself backs them.
    pub fn index_with_quotes(
        &self,
        records: &[ExtractionRecord],
        free_texts: &[&str],
        source_text: &str,
    ) -> Vec<Citation> {
        let mut seen = HashSet::new();
        let mut citations = self.record_citations(records, source_text, &mut seen);

        for free_text in free_texts {
            for quote in scan_quotes(free_text, self.policy.min_quote_chars) {
                if seen.contains(&quote.text) {
                    continue;
                }
                match find_chars(source_text, &quote.text) {
                    Some((start, end)) => {
                        seen.insert(quote.text.clone());
                        citations.push(Citation {
                            text: quote.text,
                            class: self.policy.quote_class.clone(),
                            location: Some(Location::new(start, end)),
                            confidence: self.policy.recovered_confidence,
                        });
                    }
                    None => debug!("Quoted text not found in source: {:?}", quote.text),
                }
            }
        }

        sort_by_location(&mut citations);
        log_summary(&citations);
        citations
    }

    fn record_citations(
        &self,
        records: &[ExtractionRecord],
        source_text: &str,
        seen: &mut HashSet<String>,
    ) -> Vec<Citation> {
        let mut citations = Vec::with_capacity(records.len());

        for (idx, record) in records.iter().enumerate() {
            if let Err(e) = record.validate() {
                warn!("Skipping record {} for citation: {}", idx, e);
                continue;
            }
            if !seen.insert(record.text.clone()) {
                continue;
            }

            let location = self.locate(record, source_text);
            if location.is_none() {
                debug!(
                    "Could not locate text for class '{}' in source; keeping without location",
                    record.class
                );
            }

            citations.push(Citation {
                text: record.text.clone(),
                class: record.class.clone(),
                location,
                confidence: record
                    .confidence
                    .filter(|c| c.is_finite())
                    .map(|c| c.clamp(0.0, 1.0))
                    .unwrap_or(self.policy.native_confidence),
            });
        }

        citations
    }

    /// Stored span if it matches the text, else first occurrence in source
    fn locate(&self, record: &ExtractionRecord, source_text: &str) -> Option<Location> {
        if self.policy.trust_stored_spans {
            if let Some(span) = record.span {
                if char_slice(source_text, span.start, span.end) == Some(record.text.as_str()) {
                    return Some(Location::new(span.start, span.end));
                }
                debug!(
                    "Stale span {}..{} for class '{}', relocating",
                    span.start, span.end, record.class
                );
            }
        }

        let trimmed = record.text.trim();
        find_chars(source_text, &record.text)
            .or_else(|| find_chars(source_text, trimmed))
            .map(|(start, end)| Location::new(start, end))
    }
}

/// Located citations by start offset, unlocated ones after them in input order
fn sort_by_location(citations: &mut [Citation]) {
    citations.sort_by_key(|c| match c.location {
        Some(loc) => (0u8, loc.start),
        None => (1u8, 0),
    });
}

fn log_summary(citations: &[Citation]) {
    let located = citations.iter().filter(|c| c.location.is_some()).count();
    info!(
        "Indexed {} citations ({} located, {} without location)",
        citations.len(),
        located,
        citations.len() - located
    );
}
