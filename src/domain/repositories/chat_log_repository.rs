use async_trait::async_trait;

use crate::domain::entities::ChatLogEntry;

#[derive(Debug)]
pub enum ChatLogRepositoryError {
    DatabaseError(String),
    ValidationError(String),
}

impl std::fmt::Display for ChatLogRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatLogRepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ChatLogRepositoryError::ValidationError(msg) => {
                write!(f, "Validation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ChatLogRepositoryError {}

#[async_trait]
pub trait ChatLogRepository: Send + Sync {
    async fn insert(&self, entry: &ChatLogEntry) -> Result<(), ChatLogRepositoryError>;
    /// Turns of one session, oldest first.
    async fn history(&self, session_id: &str) -> Result<Vec<ChatLogEntry>, ChatLogRepositoryError>;
}
