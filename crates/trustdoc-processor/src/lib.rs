//! TrustDoc Processor
//!
//! Runs one uploaded document through the whole pipeline.
//!
//! # Architecture
//!
//! ```text
//! document text → RecordSource → records ─┬→ Reconciler → Template ─┐
//!                                          └→ CitationIndexer → Citations ─┴→ assemble → ResultStore
//! ```
//!
//! Input is checked before the source is called. A source failure fails the
//! whole request; the core never retries. A result that cannot be persisted
//! is still handed back inside [`ProcessError::Persist`].
//!
//! # Example Usage
//!
//! ```no_run
//! use trustdoc_processor::{MockSource, ProcessRequest, Processor};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = MockSource::new(r#"[{"class": "trust_name", "text": "THE DOE TRUST"}]"#);
//! let processor = Processor::trust_default(source);
//!
//! let outcome = processor
//!     .process(ProcessRequest::new("THE DOE TRUST, dated May 1, 2020.", "doe.txt"))
//!     .await?;
//! println!("{} citations", outcome.result.citations.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod processor;
pub mod source;
pub mod types;

pub use config::ProcessorConfig;
pub use error::ProcessError;
pub use processor::Processor;
pub use source::{MockSource, PayloadSource, SourceError};
pub use types::{ProcessOutcome, ProcessRequest};
