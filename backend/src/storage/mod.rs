//! Uploaded media storage
//!
//! Video files are written through a pluggable backend; the database keeps
//! only the relative path returned by [`MediaStorage::save`].

mod backend;
mod local;

pub use backend::{storage_name, MediaStorage, StorageError, StorageResult, FILE_PATH_MAX_LEN};
pub use local::LocalMediaStorage;
