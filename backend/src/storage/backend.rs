//! Storage backend trait definition.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// Maximum stored path length, matching the `video` column
pub const FILE_PATH_MAX_LEN: usize = 100;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Storage backend for uploaded media.
///
/// Paths are relative to the backend's root, e.g. `videos/1a2b3c4d_squat.mp4`.
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Store `data` under `directory`, returning the relative path written
    async fn save(&self, directory: &str, original_name: &str, data: &[u8]) -> StorageResult<String>;

    /// Read a stored file
    async fn open(&self, path: &str) -> StorageResult<Vec<u8>>;

    /// Delete a stored file
    async fn delete(&self, path: &str) -> StorageResult<()>;

    /// Check if a stored file exists
    async fn exists(&self, path: &str) -> StorageResult<bool>;
}

/// Build a collision-free relative path for an upload
///
/// The original file name is reduced to `[A-Za-z0-9._-]`, prefixed with a
/// random token and truncated so the whole path fits the column.
pub fn storage_name(directory: &str, original_name: &str) -> StorageResult<String> {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    let sanitized: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
        .collect();
    if sanitized.trim_matches('.').is_empty() {
        return Err(StorageError::InvalidName(original_name.to_string()));
    }

    let token = Uuid::new_v4().simple().to_string();
    let prefix = format!("{}/{}_", directory.trim_end_matches('/'), &token[..8]);
    let budget = FILE_PATH_MAX_LEN.saturating_sub(prefix.len());
    if budget == 0 {
        return Err(StorageError::InvalidName(directory.to_string()));
    }

    // Keep the extension when truncating
    let name = if sanitized.len() > budget {
        match sanitized.rsplit_once('.') {
            Some((stem, ext)) if ext.len() + 1 < budget => {
                format!("{}.{}", &stem[..budget - ext.len() - 1], ext)
            }
            _ => sanitized[..budget].to_string(),
        }
    } else {
        sanitized
    };

    Ok(format!("{}{}", prefix, name))
}
