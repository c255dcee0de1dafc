use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::entities::Chunk;
use crate::domain::value_objects::ChunkMetadata;
use crate::domain::value_objects::chunk_metadata::FILE_ID_KEY;

#[derive(Debug)]
pub enum VectorStoreError {
    StorageError(String),
    SerializationError(String),
    InvalidInput(String),
    Unsupported(String),
}

impl std::fmt::Display for VectorStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VectorStoreError::StorageError(msg) => write!(f, "Storage error: {}", msg),
            VectorStoreError::SerializationError(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            VectorStoreError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            VectorStoreError::Unsupported(msg) => write!(f, "Unsupported operation: {}", msg),
        }
    }
}

impl std::error::Error for VectorStoreError {}

/// Equality match on a single metadata key.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataFilter {
    pub key: String,
    pub value: serde_json::Value,
}

impl MetadataFilter {
    pub fn equals(key: &str, value: serde_json::Value) -> Self {
        Self {
            key: key.to_string(),
            value,
        }
    }

    pub fn file_id(file_id: i32) -> Self {
        Self::equals(FILE_ID_KEY, serde_json::Value::Number(file_id.into()))
    }

    pub fn matches(&self, metadata: &ChunkMetadata) -> bool {
        metadata.get_property(&self.key) == Some(&self.value)
    }

    /// The value as it reads through Postgres' `->>` operator.
    pub fn value_as_text(&self) -> String {
        match &self.value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedChunk {
    pub id: String,
    pub chunk: Chunk,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn add(&self, entries: Vec<EmbeddedChunk>) -> Result<Vec<String>, VectorStoreError>;

    /// Nearest first.
    async fn similarity_search(
        &self,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredChunk>, VectorStoreError>;

    /// Primary deletion path: remove every entry whose metadata matches.
    async fn delete_where(&self, filter: &MetadataFilter) -> Result<usize, VectorStoreError>;

    async fn ids_where(&self, filter: &MetadataFilter) -> Result<Vec<String>, VectorStoreError>;

    async fn delete_ids(&self, ids: &[String]) -> Result<usize, VectorStoreError>;

    /// Flush to durable storage.
    async fn persist(&self) -> Result<(), VectorStoreError>;

    async fn count(&self) -> Result<usize, VectorStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_file_id_filter_matches_only_same_id() {
        let filter = MetadataFilter::file_id(4);
        let mut metadata = ChunkMetadata::new();
        assert!(!filter.matches(&metadata));

        metadata.set_file_id(4);
        assert!(filter.matches(&metadata));

        metadata.set_file_id(40);
        assert!(!filter.matches(&metadata));
    }

    #[test]
    fn test_value_as_text() {
        assert_eq!(MetadataFilter::file_id(12).value_as_text(), "12");
        assert_eq!(
            MetadataFilter::equals("source", json!("a.pdf")).value_as_text(),
            "a.pdf"
        );
    }
}
