use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::file_storage::{FileStorage, FileStorageError, TempFile};

const TEMP_PREFIX: &str = "temp_";

/// Spools uploads into `base_path` as `temp_<name>` while they are indexed.
pub struct LocalFileStorage {
    base_path: PathBuf,
}

impl LocalFileStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub async fn ensure_directory_exists(&self) -> Result<(), FileStorageError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(FileStorageError::from)
    }

    fn temp_path(&self, file_name: &str) -> Result<PathBuf, FileStorageError> {
        // Client-supplied names may carry directories; only the last component is used.
        let base_name = Path::new(file_name)
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| FileStorageError::InvalidPath(file_name.to_string()))?;

        Ok(self.base_path.join(format!("{}{}", TEMP_PREFIX, base_name)))
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn store_temp(&self, file_name: &str, data: &[u8]) -> Result<TempFile, FileStorageError> {
        let path = self.temp_path(file_name)?;
        self.ensure_directory_exists().await?;

        fs::write(&path, data).await?;
        tracing::debug!("Stored {} bytes at {}", data.len(), path.display());

        Ok(TempFile::new(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_temp_writes_prefixed_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path().to_path_buf());

        let temp = storage.store_temp("report.pdf", b"%PDF-1.4").await.unwrap();

        assert_eq!(temp.path(), dir.path().join("temp_report.pdf"));
        assert_eq!(std::fs::read(temp.path()).unwrap(), b"%PDF-1.4");
    }

    #[tokio::test]
    async fn test_directories_in_name_are_stripped() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path().to_path_buf());

        let temp = storage
            .store_temp("../../etc/notes.html", b"<p>hi</p>")
            .await
            .unwrap();

        assert_eq!(temp.path(), dir.path().join("temp_notes.html"));
    }

    #[tokio::test]
    async fn test_missing_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("uploads").join("incoming");
        let storage = LocalFileStorage::new(nested.clone());

        let temp = storage.store_temp("a.docx", b"PK").await.unwrap();

        assert!(temp.path().starts_with(&nested));
        assert!(temp.path().exists());
    }

    #[tokio::test]
    async fn test_name_without_file_component_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path().to_path_buf());

        assert!(matches!(
            storage.store_temp("..", b"x").await,
            Err(FileStorageError::InvalidPath(_))
        ));
        assert!(matches!(
            storage.store_temp("", b"x").await,
            Err(FileStorageError::InvalidPath(_))
        ));
    }

    #[tokio::test]
    async fn test_dropping_guard_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path().to_path_buf());

        let path = {
            let temp = storage.store_temp("x.pdf", b"x").await.unwrap();
            temp.path().to_path_buf()
        };

        assert!(!path.exists());
    }
}
