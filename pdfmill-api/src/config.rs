//! Service configuration.
//!
//! One explicit struct, built once in `main` from the environment and
//! injected through shared state; handlers never consult ambient globals.

use pdfmill_core::naming;
use std::collections::HashSet;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP listener binds to.
    pub bind_addr: String,
    /// Ingest area for staged uploads.
    pub upload_dir: PathBuf,
    /// Output area for generated artifacts.
    pub processed_dir: PathBuf,
    /// Lowercase input extensions accepted by the upload endpoint.
    pub allowed_extensions: HashSet<String>,
    /// Maximum request body size in bytes.
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            upload_dir: PathBuf::from("uploads"),
            processed_dir: PathBuf::from("processed"),
            allowed_extensions: ["pdf".to_string()].into_iter().collect(),
            max_upload_bytes: 32 * 1024 * 1024,
        }
    }
}

impl AppConfig {
    /// Defaults overridden by `PDFMILL_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = env::var("PDFMILL_BIND_ADDR") {
            config.bind_addr = value;
        }
        if let Ok(value) = env::var("PDFMILL_UPLOAD_DIR") {
            config.upload_dir = PathBuf::from(value);
        }
        if let Ok(value) = env::var("PDFMILL_PROCESSED_DIR") {
            config.processed_dir = PathBuf::from(value);
        }
        if let Ok(value) = env::var("PDFMILL_MAX_UPLOAD_BYTES") {
            if let Ok(bytes) = value.parse() {
                config.max_upload_bytes = bytes;
            }
        }
        if let Ok(value) = env::var("PDFMILL_ALLOWED_EXTENSIONS") {
            let extensions: HashSet<String> = value
                .split(',')
                .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|ext| !ext.is_empty())
                .collect();
            if !extensions.is_empty() {
                config.allowed_extensions = extensions;
            }
        }
        config
    }

    /// Create both storage areas; safe to call on every startup.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.upload_dir)?;
        std::fs::create_dir_all(&self.processed_dir)?;
        Ok(())
    }

    /// Extension allow-list check for a client-supplied filename.
    pub fn is_allowed_file(&self, filename: &str) -> bool {
        naming::has_allowed_extension(filename, &self.allowed_extensions)
    }
}
