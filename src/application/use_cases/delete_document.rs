use std::sync::Arc;

use crate::application::services::IndexingService;
use crate::domain::repositories::DocumentRepository;

/// Delete never fails outright; a partial failure is reported as an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteDocumentOutcome {
    Deleted,
    /// Chunks are gone but the record could not be removed.
    RecordDeletionFailed,
    /// Nothing was touched.
    IndexDeletionFailed,
}

pub struct DeleteDocumentUseCase {
    document_repository: Arc<dyn DocumentRepository>,
    indexing_service: Arc<IndexingService>,
}

impl DeleteDocumentUseCase {
    pub fn new(
        document_repository: Arc<dyn DocumentRepository>,
        indexing_service: Arc<IndexingService>,
    ) -> Self {
        Self {
            document_repository,
            indexing_service,
        }
    }

    pub async fn execute(&self, file_id: i32) -> DeleteDocumentOutcome {
        // Chunks first, so a record is never removed while its vectors remain.
        if !self.indexing_service.delete(file_id).await {
            return DeleteDocumentOutcome::IndexDeletionFailed;
        }

        match self.document_repository.delete(file_id).await {
            Ok(true) => DeleteDocumentOutcome::Deleted,
            Ok(false) => {
                tracing::warn!("No document record with id {} to delete", file_id);
                DeleteDocumentOutcome::Deleted
            }
            Err(e) => {
                tracing::error!("Failed to delete document record {}: {}", file_id, e);
                DeleteDocumentOutcome::RecordDeletionFailed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MetadataFilter, VectorStore};
    use crate::application::services::{RecursiveCharacterSplitter, VectorIndex};
    use crate::infrastructure::vector_store::LocalVectorStore;
    use crate::testing::{
        FlakyVectorStore, HashEmbeddingProvider, InMemoryDocumentRepository, StaticDocumentLoader,
    };
    use std::path::Path;

    struct Fixture {
        _dir: tempfile::TempDir,
        documents: Arc<InMemoryDocumentRepository>,
        store: Arc<FlakyVectorStore>,
        indexing: Arc<IndexingService>,
        use_case: DeleteDocumentUseCase,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let local = Arc::new(LocalVectorStore::open(dir.path()).unwrap());
        let store = Arc::new(FlakyVectorStore::new(local));
        let index = Arc::new(VectorIndex::new(
            Arc::new(HashEmbeddingProvider::default()),
            store.clone(),
        ));
        let indexing = Arc::new(IndexingService::new(
            Arc::new(StaticDocumentLoader::with_text("some indexed text")),
            RecursiveCharacterSplitter::default(),
            index,
        ));
        let documents = Arc::new(InMemoryDocumentRepository::default());

        Fixture {
            _dir: dir,
            use_case: DeleteDocumentUseCase::new(documents.clone(), indexing.clone()),
            documents,
            store,
            indexing,
        }
    }

    async fn indexed_document(fx: &Fixture) -> i32 {
        let id = fx.documents.insert("report.pdf").await.unwrap();
        assert!(fx.indexing.index(Path::new("report.pdf"), id).await);
        id
    }

    #[tokio::test]
    async fn test_delete_removes_chunks_and_record() {
        let fx = fixture();
        let id = indexed_document(&fx).await;

        assert_eq!(fx.use_case.execute(id).await, DeleteDocumentOutcome::Deleted);
        assert!(fx.documents.find_all().await.unwrap().is_empty());
        assert!(fx.store.ids_where(&MetadataFilter::file_id(id)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_id_still_reports_deleted() {
        let fx = fixture();

        assert_eq!(fx.use_case.execute(999).await, DeleteDocumentOutcome::Deleted);
    }

    #[tokio::test]
    async fn test_index_failure_leaves_record_in_place() {
        let fx = fixture();
        let id = indexed_document(&fx).await;
        fx.store.fail_delete_where();
        fx.store.fail_delete_ids();

        assert_eq!(
            fx.use_case.execute(id).await,
            DeleteDocumentOutcome::IndexDeletionFailed
        );
        assert_eq!(fx.documents.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_record_failure_after_chunks_are_gone() {
        let fx = fixture();
        let id = indexed_document(&fx).await;
        fx.documents.fail_deletes();

        assert_eq!(
            fx.use_case.execute(id).await,
            DeleteDocumentOutcome::RecordDeletionFailed
        );
        assert_eq!(fx.store.count().await.unwrap(), 0);
    }
}
