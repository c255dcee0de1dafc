use async_trait::async_trait;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum FileStorageError {
    PermissionDenied(String),
    IoError(String),
    InvalidPath(String),
}

impl std::fmt::Display for FileStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileStorageError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            FileStorageError::IoError(msg) => write!(f, "IO error: {}", msg),
            FileStorageError::InvalidPath(path) => write!(f, "Invalid path: {}", path),
        }
    }
}

impl std::error::Error for FileStorageError {}

impl From<std::io::Error> for FileStorageError {
    fn from(error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                FileStorageError::PermissionDenied(error.to_string())
            }
            _ => FileStorageError::IoError(error.to_string()),
        }
    }
}

/// An uploaded file spooled to disk for the duration of one request.
///
/// The file is removed when the guard is dropped, whichever way the request ends.
#[derive(Debug)]
pub struct TempFile {
    path: PathBuf,
}

impl TempFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!("Removed temp file {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                "Failed to remove temp file {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}

#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Writes `data` to a scratch location named after `file_name`.
    async fn store_temp(&self, file_name: &str, data: &[u8]) -> Result<TempFile, FileStorageError>;
}
