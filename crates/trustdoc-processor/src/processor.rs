//! Core Processor implementation

use crate::config::ProcessorConfig;
use crate::error::ProcessError;
use crate::types::{ProcessOutcome, ProcessRequest};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use trustdoc_citation::CitationIndexer;
use trustdoc_domain::text::char_len;
use trustdoc_domain::{RecordSource, SourceOutput};
use trustdoc_reconciler::Reconciler;
use trustdoc_store::{assemble, ResultMetadata, ResultStore};

/// Runs one document through source → reconcile → index → assemble → persist
///
/// The processor holds no per-document state; one instance can serve any
/// number of sequential or concurrent requests.
pub struct Processor<S>
where
    S: RecordSource,
{
    source: Arc<S>,
    reconciler: Reconciler,
    indexer: CitationIndexer,
    store: Option<ResultStore>,
    config: ProcessorConfig,
}

impl<S> Processor<S>
where
    S: RecordSource + Send + Sync + 'static,
    S::Error: std::fmt::Display,
{
    /// Create a processor; results are not persisted until a store is attached
    pub fn new(
        source: S,
        reconciler: Reconciler,
        indexer: CitationIndexer,
        config: ProcessorConfig,
    ) -> Result<Self, ProcessError> {
        config.validate().map_err(ProcessError::Config)?;
        Ok(Self {
            source: Arc::new(source),
            reconciler,
            indexer,
            store: None,
            config,
        })
    }

    /// Processor with the built-in trust template and default policies
    pub fn trust_default(source: S) -> Self {
        Self {
            source: Arc::new(source),
            reconciler: Reconciler::trust_default(),
            indexer: CitationIndexer::default(),
            store: None,
            config: ProcessorConfig::default(),
        }
    }

    /// Persist every result into `store`
    pub fn with_store(mut self, store: ResultStore) -> Self {
        self.store = Some(store);
        self
    }

    /// The attached store, if any
    pub fn store(&self) -> Option<&ResultStore> {
        self.store.as_ref()
    }

    /// The record source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Process one document
    pub async fn process(&self, request: ProcessRequest) -> Result<ProcessOutcome, ProcessError> {
        let started = Instant::now();
        self.check_input(&request.document_text)?;

        info!(
            "Processing '{}' ({} chars) with source '{}'",
            request.filename,
            char_len(&request.document_text),
            self.source.name()
        );

        let output = self.call_source(&request.document_text).await?;
        self.finish(request, output, started)
    }

    fn check_input(&self, document_text: &str) -> Result<(), ProcessError> {
        if document_text.trim().is_empty() {
            return Err(ProcessError::EmptyDocument);
        }
        let chars = char_len(document_text);
        if chars > self.config.max_document_chars {
            return Err(ProcessError::DocumentTooLong(
                chars,
                self.config.max_document_chars,
            ));
        }
        Ok(())
    }

    /// Call the source on the blocking pool since RecordSource is not async
    async fn call_source(&self, document_text: &str) -> Result<SourceOutput, ProcessError> {
        let source = Arc::clone(&self.source);
        let text = document_text.to_string();

        tokio::task::spawn_blocking(move || {
            source.extract(&text).map_err(|e| ProcessError::Source {
                source_name: source.name().to_string(),
                message: e.to_string(),
            })
        })
        .await
        .map_err(|e| ProcessError::Join(e.to_string()))?
    }

    fn finish(
        &self,
        request: ProcessRequest,
        output: SourceOutput,
        started: Instant,
    ) -> Result<ProcessOutcome, ProcessError> {
        let records_received = output.records.len();
        debug!("Source returned {} records", records_received);

        let reconciliation = self.reconciler.reconcile_with_report(&output.records);

        let citations = if self.config.scan_quotes && !output.free_text.is_empty() {
            let free_texts: Vec<&str> = output.free_text.iter().map(String::as_str).collect();
            self.indexer
                .index_with_quotes(&output.records, &free_texts, &request.document_text)
        } else {
            self.indexer.index(&output.records, &request.document_text)
        };

        let metadata = ResultMetadata::new(request.filename, started.elapsed());
        let result = assemble(reconciliation.template, citations, metadata);

        let persisted = match &self.store {
            Some(store) => match store.persist(&result, output.raw.as_ref()) {
                Ok(paths) => Some(paths),
                Err(error) => {
                    warn!("Result {} not persisted: {}", result.metadata.run_id, error);
                    return Err(ProcessError::Persist {
                        error,
                        result: Box::new(result),
                    });
                }
            },
            None => None,
        };

        info!(
            "Processed '{}' in {} ms: {} citations",
            result.metadata.original_filename,
            result.metadata.processing_time_ms,
            result.citations.len()
        );

        Ok(ProcessOutcome {
            result,
            report: reconciliation.report,
            records_received,
            persisted,
        })
    }
}
