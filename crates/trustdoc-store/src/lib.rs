//! TrustDoc Result Store
//!
//! Assembles processing results and persists them as JSON artifacts.
//!
//! # Layout
//!
//! One directory holds every result. Each processed document produces a
//! `FORMATTED_<base>.json` file with the [`ProcessingResult`] and, optionally,
//! a `RAW_<base>.json` file with the untouched model payload. The two share
//! `<base>`; the formatted file never embeds the raw payload.
//!
//! # Examples
//!
//! ```no_run
//! use std::time::Duration;
//! use trustdoc_domain::Template;
//! use trustdoc_store::{assemble, ResultMetadata, ResultStore, StoreConfig};
//!
//! let store = ResultStore::open(StoreConfig::in_dir("output")).unwrap();
//! let result = assemble(
//!     Template::new(),
//!     Vec::new(),
//!     ResultMetadata::new("trust.txt", Duration::from_millis(40)),
//! );
//! let paths = store.persist(&result, None).unwrap();
//! assert_eq!(store.load(&paths.formatted_path).unwrap(), result);
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod naming;
pub mod result;
pub mod store;

pub use config::StoreConfig;
pub use error::StoreError;
pub use naming::{sanitize_filename, ArtifactName};
pub use result::{assemble, ProcessingResult, ResultMetadata};
pub use store::{load, PersistedPaths, ResultStore};
