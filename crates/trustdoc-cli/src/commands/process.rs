//! Process command implementation.

use crate::cli::ProcessArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use trustdoc_citation::CitationIndexer;
use trustdoc_processor::{PayloadSource, ProcessError, ProcessRequest, Processor};
use trustdoc_reconciler::{Reconciler, TemplateShape};
use trustdoc_store::ResultStore;

/// Execute the process command.
pub async fn execute_process(
    args: ProcessArgs,
    config: &Config,
    template: TemplateShape,
    formatter: &Formatter,
) -> Result<()> {
    let (request, source) = if args.stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        request_from_stdin(&buffer, args.filename)?
    } else {
        request_from_files(&args)?
    };

    let reconciler = Reconciler::new(template, config.reconciler.clone())?;
    let indexer = CitationIndexer::new(config.citation.clone())?;
    let mut processor = Processor::new(source, reconciler, indexer, config.processor.clone())?;

    if !args.no_save {
        let mut store_config = config.store.clone();
        if let Some(dir) = args.output_dir {
            store_config.output_dir = dir;
        }
        processor = processor.with_store(ResultStore::open(store_config)?);
    }

    let outcome = processor.process(request).await?;

    if let Some(paths) = &outcome.persisted {
        eprintln!("{}", formatter.persisted(paths));
    }
    println!("{}", formatter.result(&outcome.result)?);

    Ok(())
}

/// Request body accepted on stdin.
#[derive(Debug, Deserialize)]
struct StdinRequest {
    #[serde(default)]
    document_text: String,
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    records: Option<Value>,
    #[serde(default)]
    extractions: Option<Value>,
    #[serde(default)]
    narratives: Vec<String>,
}

fn request_from_stdin(
    body: &str,
    filename_override: Option<String>,
) -> Result<(ProcessRequest, PayloadSource)> {
    let body: StdinRequest = serde_json::from_str(body)?;

    if body.document_text.trim().is_empty() {
        return Err(ProcessError::EmptyDocument.into());
    }
    let payload = body.extractions.or(body.records).ok_or_else(|| {
        CliError::InvalidInput("No records or extractions provided".to_string())
    })?;

    let filename = filename_override
        .or(body.filename)
        .unwrap_or_else(|| "document.txt".to_string());
    let source = PayloadSource::new("stdin", payload).with_free_text(body.narratives);

    Ok((ProcessRequest::new(body.document_text, filename), source))
}

fn request_from_files(args: &ProcessArgs) -> Result<(ProcessRequest, PayloadSource)> {
    let (document, extractions) = match (&args.document, &args.extractions) {
        (Some(document), Some(extractions)) => (document, extractions),
        _ => {
            return Err(CliError::InvalidInput(
                "Must specify --document and --extractions, or --stdin".to_string(),
            ))
        }
    };

    let document_text = fs::read_to_string(document)?;
    let response = fs::read_to_string(extractions)?;
    let narratives = args
        .narrative
        .iter()
        .map(fs::read_to_string)
        .collect::<std::io::Result<Vec<_>>>()?;

    let source = PayloadSource::parse(display_name(extractions), &response)
        .map_err(|e| CliError::InvalidInput(format!("{}: {}", extractions.display(), e)))?
        .with_free_text(narratives);

    let filename = args
        .filename
        .clone()
        .unwrap_or_else(|| display_name(document));

    Ok((ProcessRequest::new(document_text, filename), source))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
