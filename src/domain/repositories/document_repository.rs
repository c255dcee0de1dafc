use async_trait::async_trait;

use crate::domain::entities::DocumentRecord;

#[derive(Debug)]
pub enum DocumentRepositoryError {
    DatabaseError(String),
}

impl std::fmt::Display for DocumentRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentRepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for DocumentRepositoryError {}

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Inserts a record stamped with the current time and returns its generated id.
    async fn insert(&self, filename: &str) -> Result<i32, DocumentRepositoryError>;
    /// All records, newest upload first.
    async fn find_all(&self) -> Result<Vec<DocumentRecord>, DocumentRepositoryError>;
    /// Returns whether a row was removed.
    async fn delete(&self, id: i32) -> Result<bool, DocumentRepositoryError>;
}
