use std::path::Path;
use std::sync::Arc;

use crate::application::ports::FileStorage;
use crate::application::services::IndexingService;
use crate::domain::repositories::{DocumentRepository, DocumentRepositoryError};
use crate::domain::value_objects::{DocumentFormat, UnsupportedFileType};

#[derive(Debug)]
pub enum UploadDocumentError {
    UnsupportedFileType(UnsupportedFileType),
    ValidationError(String),
    StorageError(String),
    RepositoryError(String),
    IndexingFailed(String),
}

impl std::fmt::Display for UploadDocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadDocumentError::UnsupportedFileType(e) => write!(f, "{}", e),
            UploadDocumentError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            UploadDocumentError::StorageError(msg) => write!(f, "Storage error: {}", msg),
            UploadDocumentError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
            UploadDocumentError::IndexingFailed(filename) => {
                write!(f, "Failed to index {}", filename)
            }
        }
    }
}

impl std::error::Error for UploadDocumentError {}

impl From<DocumentRepositoryError> for UploadDocumentError {
    fn from(error: DocumentRepositoryError) -> Self {
        UploadDocumentError::RepositoryError(error.to_string())
    }
}

impl From<UnsupportedFileType> for UploadDocumentError {
    fn from(error: UnsupportedFileType) -> Self {
        UploadDocumentError::UnsupportedFileType(error)
    }
}

#[derive(Debug, Clone)]
pub struct UploadDocumentRequest {
    pub file_name: String,
    pub file_data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadDocumentResponse {
    pub file_id: i32,
    pub file_name: String,
}

pub struct UploadDocumentUseCase {
    document_repository: Arc<dyn DocumentRepository>,
    file_storage: Arc<dyn FileStorage>,
    indexing_service: Arc<IndexingService>,
}

impl UploadDocumentUseCase {
    pub fn new(
        document_repository: Arc<dyn DocumentRepository>,
        file_storage: Arc<dyn FileStorage>,
        indexing_service: Arc<IndexingService>,
    ) -> Self {
        Self {
            document_repository,
            file_storage,
            indexing_service,
        }
    }

    pub async fn execute(
        &self,
        request: UploadDocumentRequest,
    ) -> Result<UploadDocumentResponse, UploadDocumentError> {
        if request.file_name.trim().is_empty() {
            return Err(UploadDocumentError::ValidationError(
                "File name cannot be empty".to_string(),
            ));
        }

        DocumentFormat::from_path(Path::new(&request.file_name))?;

        // Removed again when `temp_file` goes out of scope.
        let temp_file = self
            .file_storage
            .store_temp(&request.file_name, &request.file_data)
            .await
            .map_err(|e| UploadDocumentError::StorageError(e.to_string()))?;

        let file_id = self.document_repository.insert(&request.file_name).await?;

        if !self.indexing_service.index(temp_file.path(), file_id).await {
            if let Err(e) = self.document_repository.delete(file_id).await {
                tracing::error!(
                    "Failed to roll back document record {} after indexing failure: {}",
                    file_id,
                    e
                );
            }
            return Err(UploadDocumentError::IndexingFailed(request.file_name));
        }

        tracing::info!("Uploaded and indexed {} as document {}", request.file_name, file_id);

        Ok(UploadDocumentResponse {
            file_id,
            file_name: request.file_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::VectorStore;
    use crate::application::services::{RecursiveCharacterSplitter, VectorIndex};
    use crate::infrastructure::file_system::LocalFileStorage;
    use crate::infrastructure::vector_store::LocalVectorStore;
    use crate::testing::{HashEmbeddingProvider, InMemoryDocumentRepository, StaticDocumentLoader};

    struct Fixture {
        _vector_dir: tempfile::TempDir,
        upload_dir: tempfile::TempDir,
        documents: Arc<InMemoryDocumentRepository>,
        store: Arc<LocalVectorStore>,
        use_case: UploadDocumentUseCase,
    }

    fn fixture(loader: StaticDocumentLoader) -> Fixture {
        let vector_dir = tempfile::tempdir().unwrap();
        let upload_dir = tempfile::tempdir().unwrap();
        let store = Arc::new(LocalVectorStore::open(vector_dir.path()).unwrap());
        let index = Arc::new(VectorIndex::new(
            Arc::new(HashEmbeddingProvider::default()),
            store.clone(),
        ));
        let indexing = Arc::new(IndexingService::new(
            Arc::new(loader),
            RecursiveCharacterSplitter::default(),
            index,
        ));
        let documents = Arc::new(InMemoryDocumentRepository::default());
        let storage = Arc::new(LocalFileStorage::new(upload_dir.path().to_path_buf()));

        Fixture {
            _vector_dir: vector_dir,
            use_case: UploadDocumentUseCase::new(documents.clone(), storage, indexing),
            upload_dir,
            documents,
            store,
        }
    }

    fn request(name: &str) -> UploadDocumentRequest {
        UploadDocumentRequest {
            file_name: name.to_string(),
            file_data: b"irrelevant, the loader is stubbed".to_vec(),
        }
    }

    fn upload_dir_is_empty(fx: &Fixture) -> bool {
        std::fs::read_dir(fx.upload_dir.path()).unwrap().next().is_none()
    }

    #[tokio::test]
    async fn test_successful_upload_keeps_record_and_chunks() {
        let fx = fixture(StaticDocumentLoader::with_text("quarterly revenue grew"));

        let response = fx.use_case.execute(request("report.pdf")).await.unwrap();

        assert_eq!(response.file_name, "report.pdf");
        assert_eq!(fx.documents.find_all().await.unwrap().len(), 1);
        assert_eq!(
            fx.store
                .ids_where(&crate::application::ports::MetadataFilter::file_id(response.file_id))
                .await
                .unwrap()
                .len(),
            1
        );
        assert!(upload_dir_is_empty(&fx));
    }

    #[tokio::test]
    async fn test_unsupported_extension_touches_nothing() {
        let fx = fixture(StaticDocumentLoader::with_text("text"));

        let result = fx.use_case.execute(request("notes.txt")).await;

        assert!(matches!(result, Err(UploadDocumentError::UnsupportedFileType(_))));
        assert!(fx.documents.find_all().await.unwrap().is_empty());
        assert!(upload_dir_is_empty(&fx));
    }

    #[tokio::test]
    async fn test_extension_check_is_case_insensitive() {
        let fx = fixture(StaticDocumentLoader::with_text("text"));

        assert!(fx.use_case.execute(request("REPORT.PDF")).await.is_ok());
    }

    #[tokio::test]
    async fn test_indexing_failure_rolls_back_record() {
        let fx = fixture(StaticDocumentLoader::failing());

        let result = fx.use_case.execute(request("broken.pdf")).await;

        match result {
            Err(UploadDocumentError::IndexingFailed(name)) => assert_eq!(name, "broken.pdf"),
            other => panic!("expected IndexingFailed, got {:?}", other),
        }
        assert!(fx.documents.find_all().await.unwrap().is_empty());
        assert_eq!(fx.store.count().await.unwrap(), 0);
        assert!(upload_dir_is_empty(&fx));
    }

    #[tokio::test]
    async fn test_empty_file_name_is_rejected() {
        let fx = fixture(StaticDocumentLoader::with_text("text"));

        let result = fx.use_case.execute(request("  ")).await;

        assert!(matches!(result, Err(UploadDocumentError::ValidationError(_))));
    }
}
