//! Filesystem result store

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::naming::{sanitize_filename, ArtifactName};
use crate::result::ProcessingResult;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Where a result's artifacts were written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedPaths {
    /// The `FORMATTED_` result file
    pub formatted_path: PathBuf,

    /// The `RAW_` payload file, when one was written
    pub raw_path: Option<PathBuf>,
}

/// Writes results as JSON files into one output directory
///
/// Every file is written to a temp file in the output directory and then
/// moved into place without replacing an existing file. On a name collision
/// the next sequence number is tried, so concurrent writers sharing the
/// directory never overwrite each other.
#[derive(Debug)]
pub struct ResultStore {
    config: StoreConfig,
    seq: AtomicU64,
}

impl ResultStore {
    /// Open a store, creating the output directory if needed
    pub fn open(config: StoreConfig) -> Result<Self, StoreError> {
        config.validate()?;
        fs::create_dir_all(&config.output_dir)?;
        debug!("Result store ready at {}", config.output_dir.display());
        Ok(Self {
            config,
            seq: AtomicU64::new(0),
        })
    }

    /// The configuration in use
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The output directory
    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }

    /// Write a result and, if given and enabled, its raw payload
    ///
    /// Both artifacts share a base name derived from the result's
    /// `processed_date` and `original_filename`. The raw file is placed
    /// first and the formatted file last; if the formatted file cannot be
    /// placed, the raw file is removed again, so a failed call leaves no
    /// artifact behind.
    pub fn persist(
        &self,
        result: &ProcessingResult,
        raw: Option<&Value>,
    ) -> Result<PersistedPaths, StoreError> {
        let sanitized = sanitize_filename(
            &result.metadata.original_filename,
            self.config.max_name_chars,
        );
        let mut formatted_tmp = self.temp_file_with(&self.encode(result)?)?;
        let raw_bytes = match raw {
            Some(payload) if self.config.save_raw => Some(self.encode(payload)?),
            _ => None,
        };

        let mut attempts = 0;
        loop {
            attempts += 1;
            let name = ArtifactName::new(
                result.metadata.processed_date,
                self.seq.fetch_add(1, Ordering::Relaxed),
                &sanitized,
            );

            let raw_path = match &raw_bytes {
                Some(bytes) => {
                    let path = self.config.output_dir.join(name.raw());
                    match self.temp_file_with(bytes)?.persist_noclobber(&path) {
                        Ok(_) => Some(path),
                        Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                            self.collided(&path, attempts, &sanitized)?;
                            continue;
                        }
                        Err(e) => return Err(e.error.into()),
                    }
                }
                None => None,
            };

            let formatted_path = self.config.output_dir.join(name.formatted());
            match formatted_tmp.persist_noclobber(&formatted_path) {
                Ok(_) => {
                    info!(
                        "Persisted result {} to {}",
                        result.metadata.run_id,
                        formatted_path.display()
                    );
                    return Ok(PersistedPaths {
                        formatted_path,
                        raw_path,
                    });
                }
                Err(e) => {
                    if let Some(path) = &raw_path {
                        remove_partial(path);
                    }
                    if e.error.kind() != ErrorKind::AlreadyExists {
                        return Err(e.error.into());
                    }
                    self.collided(&formatted_path, attempts, &sanitized)?;
                    formatted_tmp = e.file;
                }
            }
        }
    }

    /// Read a formatted result back
    pub fn load(&self, path: impl AsRef<Path>) -> Result<ProcessingResult, StoreError> {
        load(path)
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, StoreError> {
        let bytes = if self.config.pretty {
            serde_json::to_vec_pretty(value)?
        } else {
            serde_json::to_vec(value)?
        };
        Ok(bytes)
    }

    fn temp_file_with(&self, bytes: &[u8]) -> Result<NamedTempFile, StoreError> {
        let mut tmp = NamedTempFile::new_in(&self.config.output_dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        Ok(tmp)
    }

    /// Fail once the attempt budget is spent, else log and let the caller retry
    fn collided(&self, path: &Path, attempts: u32, sanitized: &str) -> Result<(), StoreError> {
        if attempts >= self.config.max_attempts {
            return Err(StoreError::NameExhausted(sanitized.to_string(), attempts));
        }
        warn!("{} already exists, trying next sequence", path.display());
        Ok(())
    }
}

fn remove_partial(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        warn!("Could not remove partial artifact {}: {}", path.display(), e);
    }
}

/// Read a formatted result from `path`
///
/// Raw payload files are rejected: they are not results.
pub fn load(path: impl AsRef<Path>) -> Result<ProcessingResult, StoreError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| {
        StoreError::InvalidData(format!("{} is not a processing result: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_rejects_invalid_config() {
        let config = StoreConfig {
            max_name_chars: 0,
            ..StoreConfig::default()
        };
        assert!(matches!(ResultStore::open(config), Err(StoreError::Config(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load("/nonexistent/trustdoc/FORMATTED_x.json");
        assert!(matches!(result, Err(StoreError::Io(_))));
    }
}
