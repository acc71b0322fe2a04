//! Staged-upload lifecycle.
//!
//! Every uploaded file is written into the ingest area under a sanitized,
//! uniquely-suffixed name and recorded in a [`StagedBatch`]. The batch owns
//! its files for the duration of one request and removes whatever is left
//! when it is dropped, so every exit path — mid-staging rejection, unknown
//! tool, dispatch failure, success — ends with a clean ingest area.

use crate::config::AppConfig;
use pdfmill_core::naming;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Storage {
    upload_dir: PathBuf,
    processed_dir: PathBuf,
}

impl Storage {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            upload_dir: config.upload_dir.clone(),
            processed_dir: config.processed_dir.clone(),
        }
    }

    pub fn processed_dir(&self) -> &Path {
        &self.processed_dir
    }

    /// Write uploaded bytes into the ingest area under a generated name.
    pub async fn stage(&self, original_name: &str, bytes: &[u8]) -> std::io::Result<StagedFile> {
        let staged_name = naming::staged_name(original_name);
        let path = self.upload_dir.join(&staged_name);
        tokio::fs::write(&path, bytes).await?;
        Ok(StagedFile {
            path,
            original_name: original_name.to_string(),
        })
    }
}

/// One uploaded file, staged under a unique name.
#[derive(Debug)]
pub struct StagedFile {
    pub path: PathBuf,
    pub original_name: String,
}

/// Owns every file staged for one request.
#[derive(Debug, Default)]
pub struct StagedBatch {
    files: Vec<StagedFile>,
}

impl StagedBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, file: StagedFile) {
        self.files.push(file);
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Staged paths in upload order, for dispatch.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|file| file.path.clone()).collect()
    }
}

impl Drop for StagedBatch {
    fn drop(&mut self) {
        for file in &self.files {
            match std::fs::remove_file(&file.path) {
                Ok(()) => {}
                // Already gone; nothing to report.
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    warn!(path = %file.path.display(), error = %e, "failed to remove staged file")
                }
            }
        }
    }
}
