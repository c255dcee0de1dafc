use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{DocumentLoadError, DocumentLoader, MetadataFilter, VectorStoreError};
use crate::application::services::text_splitter::RecursiveCharacterSplitter;
use crate::application::services::vector_index::{VectorIndex, VectorIndexError};
use crate::domain::value_objects::DocumentFormat;

#[derive(Debug)]
pub enum IndexingError {
    LoadError(DocumentLoadError),
    NoContent(String),
    IndexError(VectorIndexError),
    DeletionFailed {
        primary: VectorStoreError,
        fallback: VectorStoreError,
    },
}

impl std::fmt::Display for IndexingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexingError::LoadError(e) => write!(f, "Load error: {}", e),
            IndexingError::NoContent(path) => write!(f, "No text could be extracted from {}", path),
            IndexingError::IndexError(e) => write!(f, "Index error: {}", e),
            IndexingError::DeletionFailed { primary, fallback } => write!(
                f,
                "Deletion failed (primary: {}; fallback: {})",
                primary, fallback
            ),
        }
    }
}

impl std::error::Error for IndexingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IndexingError::LoadError(e) => Some(e),
            IndexingError::IndexError(e) => Some(e),
            IndexingError::DeletionFailed { fallback, .. } => Some(fallback),
            IndexingError::NoContent(_) => None,
        }
    }
}

/// Load, split, tag and store one uploaded file; purge a file's chunks.
///
/// Failures never escape: they are logged and reported as `false`.
pub struct IndexingService {
    document_loader: Arc<dyn DocumentLoader>,
    splitter: RecursiveCharacterSplitter,
    vector_index: Arc<VectorIndex>,
}

impl IndexingService {
    pub fn new(
        document_loader: Arc<dyn DocumentLoader>,
        splitter: RecursiveCharacterSplitter,
        vector_index: Arc<VectorIndex>,
    ) -> Self {
        Self {
            document_loader,
            splitter,
            vector_index,
        }
    }

    pub async fn index(&self, file_path: &Path, file_id: i32) -> bool {
        match self.try_index(file_path, file_id).await {
            Ok(chunk_count) => {
                tracing::info!(
                    "Indexed {} chunks from {} (file_id {})",
                    chunk_count,
                    file_path.display(),
                    file_id
                );
                true
            }
            Err(e) => {
                tracing::error!("Error indexing document {}: {}", file_path.display(), e);
                tracing::error!("{:?}", e);
                false
            }
        }
    }

    pub async fn delete(&self, file_id: i32) -> bool {
        match self.try_delete(file_id).await {
            Ok(removed) => {
                tracing::info!("Removed {} chunks for file_id {}", removed, file_id);
                true
            }
            Err(e) => {
                tracing::error!(
                    "Error deleting document with file_id {} from vector index: {}",
                    file_id,
                    e
                );
                tracing::error!("{:?}", e);
                false
            }
        }
    }

    async fn try_index(&self, file_path: &Path, file_id: i32) -> Result<usize, IndexingError> {
        DocumentFormat::from_path(file_path)
            .map_err(|e| IndexingError::LoadError(DocumentLoadError::from(e)))?;

        let documents = self
            .document_loader
            .load(file_path)
            .await
            .map_err(IndexingError::LoadError)?;

        let mut chunks = self.splitter.split_documents(&documents);
        if chunks.is_empty() {
            return Err(IndexingError::NoContent(file_path.display().to_string()));
        }

        for chunk in chunks.iter_mut() {
            chunk.metadata_mut().set_file_id(file_id);
        }

        let ids = self
            .vector_index
            .add_chunks(chunks)
            .await
            .map_err(IndexingError::IndexError)?;

        self.persist_best_effort().await;

        Ok(ids.len())
    }

    async fn try_delete(&self, file_id: i32) -> Result<usize, IndexingError> {
        let filter = MetadataFilter::file_id(file_id);

        let removed = match self.vector_index.delete_where(&filter).await {
            Ok(removed) => removed,
            Err(primary) => {
                tracing::warn!(
                    "Filter delete failed for file_id {} ({}), falling back to id-based delete",
                    file_id,
                    primary
                );
                self.vector_index
                    .delete_matching(&filter)
                    .await
                    .map_err(|fallback| IndexingError::DeletionFailed { primary, fallback })?
            }
        };

        self.persist_best_effort().await;

        Ok(removed)
    }

    async fn persist_best_effort(&self) {
        if let Err(e) = self.vector_index.persist().await {
            tracing::warn!("Vector index persist failed, continuing: {}", e);
        }
    }
}
