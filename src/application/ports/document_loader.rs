use async_trait::async_trait;
use std::path::Path;

use crate::domain::entities::SourceDocument;
use crate::domain::value_objects::{DocumentFormat, UnsupportedFileType};

#[derive(Debug)]
pub enum DocumentLoadError {
    UnsupportedFileType(UnsupportedFileType),
    CorruptedFile(String),
    ExtractionFailed(String),
    IoError(String),
}

impl std::fmt::Display for DocumentLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentLoadError::UnsupportedFileType(err) => write!(f, "{}", err),
            DocumentLoadError::CorruptedFile(msg) => write!(f, "Corrupted file: {}", msg),
            DocumentLoadError::ExtractionFailed(msg) => write!(f, "Extraction failed: {}", msg),
            DocumentLoadError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for DocumentLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DocumentLoadError::UnsupportedFileType(err) => Some(err),
            _ => None,
        }
    }
}

impl From<UnsupportedFileType> for DocumentLoadError {
    fn from(err: UnsupportedFileType) -> Self {
        DocumentLoadError::UnsupportedFileType(err)
    }
}

#[async_trait]
pub trait DocumentLoader: Send + Sync {
    /// Turns a file on disk into one or more raw documents.
    async fn load(&self, file_path: &Path) -> Result<Vec<SourceDocument>, DocumentLoadError>;

    fn can_load(&self, format: DocumentFormat) -> bool;
}
