//! Durable storage for rendered protocol documents.
//!
//! A stored path is a cache entry, not a source of truth: [`ProtocolStore::load`]
//! reports a missing file as `None` so callers regenerate.

use std::io::ErrorKind;
use std::path::PathBuf;

/// Default directory for cached protocol documents.
const DEFAULT_STORAGE_DIR: &str = "storage/protocols";

/// Protocol storage configuration.
#[derive(Debug, Clone)]
pub struct ProtocolConfig {
    pub storage_dir: PathBuf,
}

impl ProtocolConfig {
    /// Load from `PROTOCOL_STORAGE_DIR` (default `storage/protocols`).
    pub fn from_env() -> Self {
        Self {
            storage_dir: std::env::var("PROTOCOL_STORAGE_DIR")
                .unwrap_or_else(|_| DEFAULT_STORAGE_DIR.into())
                .into(),
        }
    }
}

/// Filesystem store rooted at one directory.
#[derive(Debug, Clone)]
pub struct ProtocolStore {
    root: PathBuf,
}

impl ProtocolStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Write `bytes` under `file_name`, creating the directory on first use.
    /// Returns the stored path.
    pub async fn save(&self, file_name: &str, bytes: &[u8]) -> std::io::Result<String> {
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.root.join(file_name);
        tokio::fs::write(&path, bytes).await?;
        Ok(path.to_string_lossy().into_owned())
    }

    /// Read a previously stored document, or `None` if it is gone.
    pub async fn load(&self, path: &str) -> std::io::Result<Option<Vec<u8>>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}
