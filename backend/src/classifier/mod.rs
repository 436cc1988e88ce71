//! DeepFit pose-classifier loading
//!
//! The classifier ships as a TFLite file bundled with the backend. Loading
//! is a single-shot factory: every call checks the file, reads it and
//! returns a fresh classifier. Nothing is cached between calls.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::config::ModelConfig;

/// File name of the bundled classifier model
pub const MODEL_FILE_NAME: &str = "deepfit_classifier_v3.tflite";

/// Model loading failures
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model file not found at path: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read model file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Pose classifier bound to a model file
///
/// Inference is performed by the runtime that consumes the model bytes;
/// this type owns the loaded file and where it came from.
#[derive(Debug, Clone)]
pub struct DeepFitClassifier {
    model_path: PathBuf,
    model: Vec<u8>,
}

impl DeepFitClassifier {
    /// Construct a classifier from the model file at `model_path`
    pub fn new(model_path: impl Into<PathBuf>) -> Result<Self, ModelError> {
        let model_path = model_path.into();
        if !model_path.exists() {
            return Err(ModelError::NotFound { path: model_path });
        }

        let model = std::fs::read(&model_path).map_err(|source| read_failure(&model_path, source))?;

        info!(path = %model_path.display(), bytes = model.len(), "Loaded pose classifier model");

        Ok(Self { model_path, model })
    }

    /// Path the model was loaded from
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Size of the loaded model in bytes
    pub fn model_size(&self) -> usize {
        self.model.len()
    }

    /// Raw model bytes
    pub fn model_bytes(&self) -> &[u8] {
        &self.model
    }
}

/// A file removed after the existence check is still a missing model
fn read_failure(path: &Path, source: std::io::Error) -> ModelError {
    if source.kind() == std::io::ErrorKind::NotFound {
        ModelError::NotFound {
            path: path.to_path_buf(),
        }
    } else {
        ModelError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Resolve the model file inside `dir`
pub fn model_path(dir: &Path) -> PathBuf {
    dir.join(MODEL_FILE_NAME)
}

/// Load the classifier from `dir`
pub fn load_model(dir: &Path) -> Result<DeepFitClassifier, ModelError> {
    let path = model_path(dir);
    debug!(path = %path.display(), "Loading pose classifier");
    DeepFitClassifier::new(path)
}

/// Load the classifier from the configured model directory
pub fn get_model(config: &ModelConfig) -> Result<DeepFitClassifier, ModelError> {
    load_model(&config.dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn model_dir(contents: &[u8]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MODEL_FILE_NAME), contents).unwrap();
        dir
    }

    #[test]
    fn test_missing_model_reports_attempted_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_model(dir.path()).unwrap_err();

        let expected = dir.path().join(MODEL_FILE_NAME);
        match &err {
            ModelError::NotFound { path } => assert_eq!(path, &expected),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            format!("Model file not found at path: {}", expected.display())
        );
    }

    #[test]
    fn test_load_binds_classifier_to_path() {
        let dir = model_dir(b"\x1c\x00\x00\x00TFL3");
        let classifier = load_model(dir.path()).unwrap();

        assert_eq!(classifier.model_path(), dir.path().join(MODEL_FILE_NAME));
        assert_eq!(classifier.model_size(), 8);
        assert_eq!(&classifier.model_bytes()[4..], b"TFL3");
    }

    #[test]
    fn test_each_call_reloads_the_file() {
        let dir = model_dir(b"v1");
        let first = load_model(dir.path()).unwrap();

        std::fs::write(dir.path().join(MODEL_FILE_NAME), b"version-2").unwrap();
        let second = load_model(dir.path()).unwrap();

        assert_eq!(first.model_bytes(), b"v1");
        assert_eq!(second.model_bytes(), b"version-2");
    }

    #[test]
    fn test_model_removed_between_calls() {
        let dir = model_dir(b"model");
        assert!(load_model(dir.path()).is_ok());

        std::fs::remove_file(dir.path().join(MODEL_FILE_NAME)).unwrap();
        assert!(matches!(load_model(dir.path()), Err(ModelError::NotFound { .. })));
    }

    #[test]
    fn test_read_failures_keep_not_found_distinct() {
        let path = PathBuf::from("/models/deepfit_classifier_v3.tflite");

        let vanished = std::io::Error::from(std::io::ErrorKind::NotFound);
        match read_failure(&path, vanished) {
            ModelError::NotFound { path: reported } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other:?}"),
        }

        let denied = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        assert!(matches!(read_failure(&path, denied), ModelError::Io { .. }));
    }

    #[test]
    fn test_directory_at_model_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(MODEL_FILE_NAME)).unwrap();
        assert!(matches!(load_model(dir.path()), Err(ModelError::Io { .. })));
    }

    #[test]
    fn test_get_model_uses_configured_dir() {
        let dir = model_dir(b"model");
        let config = ModelConfig {
            dir: dir.path().to_path_buf(),
        };
        let classifier = get_model(&config).unwrap();
        assert_eq!(classifier.model_path(), model_path(dir.path()));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        /// Property: any missing path is reported verbatim
        #[test]
        fn prop_not_found_carries_exact_path(name in "[a-z0-9_]{1,16}") {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join(format!("{}.tflite", name));
            match DeepFitClassifier::new(path.clone()) {
                Err(ModelError::NotFound { path: reported }) => prop_assert_eq!(reported, path),
                other => prop_assert!(false, "expected NotFound, got {:?}", other),
            }
        }
    }
}
