//! Local filesystem storage backend.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::debug;

use super::backend::{storage_name, MediaStorage, StorageError, StorageResult};

/// Stores media files below a root directory, mirroring their relative path.
pub struct LocalMediaStorage {
    root: PathBuf,
}

impl LocalMediaStorage {
    /// Create a new local storage backend
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a relative path, refusing anything that escapes the root
    fn full_path(&self, path: &str) -> StorageResult<PathBuf> {
        let relative = Path::new(path);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !safe || path.is_empty() {
            return Err(StorageError::InvalidName(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

fn not_found_or_io(path: &str, e: std::io::Error) -> StorageError {
    if e.kind() == std::io::ErrorKind::NotFound {
        StorageError::NotFound(path.to_string())
    } else {
        StorageError::Io(e)
    }
}

#[async_trait]
impl MediaStorage for LocalMediaStorage {
    async fn save(&self, directory: &str, original_name: &str, data: &[u8]) -> StorageResult<String> {
        let name = storage_name(directory, original_name)?;
        let full = self.full_path(&name)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&full, data).await?;
        debug!(path = %name, bytes = data.len(), "Stored media file");
        Ok(name)
    }

    async fn open(&self, path: &str) -> StorageResult<Vec<u8>> {
        let full = self.full_path(path)?;
        fs::read(&full).await.map_err(|e| not_found_or_io(path, e))
    }

    async fn delete(&self, path: &str) -> StorageResult<()> {
        let full = self.full_path(path)?;
        fs::remove_file(&full).await.map_err(|e| not_found_or_io(path, e))
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        let full = self.full_path(path)?;
        Ok(fs::try_exists(&full).await?)
    }
}
