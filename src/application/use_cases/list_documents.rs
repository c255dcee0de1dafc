use std::sync::Arc;

use crate::domain::entities::DocumentRecord;
use crate::domain::repositories::{DocumentRepository, DocumentRepositoryError};

#[derive(Debug)]
pub enum ListDocumentsError {
    RepositoryError(String),
}

impl std::fmt::Display for ListDocumentsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListDocumentsError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for ListDocumentsError {}

impl From<DocumentRepositoryError> for ListDocumentsError {
    fn from(error: DocumentRepositoryError) -> Self {
        ListDocumentsError::RepositoryError(error.to_string())
    }
}

pub struct ListDocumentsUseCase {
    document_repository: Arc<dyn DocumentRepository>,
}

impl ListDocumentsUseCase {
    pub fn new(document_repository: Arc<dyn DocumentRepository>) -> Self {
        Self {
            document_repository,
        }
    }

    pub async fn execute(&self) -> Result<Vec<DocumentRecord>, ListDocumentsError> {
        Ok(self.document_repository.find_all().await?)
    }
}
