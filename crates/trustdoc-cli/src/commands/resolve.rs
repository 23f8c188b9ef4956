//! Resolve and citations command implementations.

use crate::cli::{CitationsArgs, ResolveArgs};
use crate::error::Result;
use crate::output::Formatter;
use std::fs;
use tracing::warn;
use trustdoc_citation::{resolve, resolve_all};

/// Execute the resolve command.
pub async fn execute_resolve(args: ResolveArgs, formatter: &Formatter) -> Result<()> {
    let result = trustdoc_store::load(&args.result)?;
    let document_text = fs::read_to_string(&args.document)?;

    let spans = if args.keys.is_empty() {
        resolve_all(&result.citations, &document_text)
    } else {
        args.keys
            .iter()
            .filter_map(|key| {
                let span = resolve(key, &result.citations, &document_text);
                if span.is_none() {
                    warn!("Citation key '{}' did not resolve", key);
                }
                span
            })
            .collect()
    };

    println!("{}", formatter.spans(&spans)?);
    Ok(())
}

/// Execute the citations command.
pub async fn execute_citations(args: CitationsArgs, formatter: &Formatter) -> Result<()> {
    let result = trustdoc_store::load(&args.result)?;
    println!("{}", formatter.citations(&result.citations)?);
    Ok(())
}
