//! File storage abstraction for uploaded images.
//!
//! The catalog stores only URLs; bytes live behind [`FileStorage`]. The
//! local-disk implementation names files by content hash so re-uploads of
//! the same image are idempotent. Deletion is best-effort everywhere: a
//! missing file must never block a database mutation.

use async_trait::async_trait;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

use crate::errors::ServiceError;

#[derive(Debug, Clone, Serialize)]
pub struct StoredFile {
    pub url: String,
    pub size: usize,
}

#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Persist the bytes and return the public URL they are served under.
    async fn store(&self, filename_hint: &str, bytes: &[u8]) -> Result<StoredFile, ServiceError>;

    /// Remove a previously stored file. Unknown URLs and missing files are
    /// not errors.
    async fn delete(&self, url: &str) -> Result<(), ServiceError>;
}

pub struct LocalDiskStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalDiskStorage {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }

    fn file_name(hint: &str, bytes: &[u8]) -> String {
        let digest = Sha256::digest(bytes);
        let stem = hex::encode(&digest[..12]);

        match Path::new(hint).extension().and_then(|e| e.to_str()) {
            Some(ext) if !ext.is_empty() => format!("{stem}.{}", ext.to_ascii_lowercase()),
            _ => stem,
        }
    }

    fn path_for(&self, url: &str) -> Option<PathBuf> {
        let name = url.strip_prefix(&self.base_url)?.trim_start_matches('/');
        // A bare file name only, so crafted URLs cannot escape the root
        if name.is_empty() || name.contains('/') || name.contains("..") {
            return None;
        }
        Some(self.root.join(name))
    }
}

#[async_trait]
impl FileStorage for LocalDiskStorage {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn store(&self, filename_hint: &str, bytes: &[u8]) -> Result<StoredFile, ServiceError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| ServiceError::InternalError(format!("upload dir unavailable: {e}")))?;

        let name = Self::file_name(filename_hint, bytes);
        let path = self.root.join(&name);

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| ServiceError::InternalError(format!("upload write failed: {e}")))?;

        debug!(file = %name, "stored upload");
        Ok(StoredFile {
            url: format!("{}/{}", self.base_url.trim_end_matches('/'), name),
            size: bytes.len(),
        })
    }

    async fn delete(&self, url: &str) -> Result<(), ServiceError> {
        let Some(path) = self.path_for(url) else {
            // Externally hosted URL, nothing to clean up
            return Ok(());
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                warn!(?path, "file deletion failed: {e}");
                Ok(())
            }
        }
    }
}
