use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::application::ports::{
    EmbeddedChunk, EmbeddingProvider, EmbeddingProviderError, MetadataFilter, VectorStore,
    VectorStoreError,
};
use crate::domain::entities::Chunk;

#[derive(Debug)]
pub enum VectorIndexError {
    EmbeddingError(EmbeddingProviderError),
    StoreError(VectorStoreError),
    EmbeddingCountMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for VectorIndexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VectorIndexError::EmbeddingError(e) => write!(f, "Embedding error: {}", e),
            VectorIndexError::StoreError(e) => write!(f, "Vector store error: {}", e),
            VectorIndexError::EmbeddingCountMismatch { expected, actual } => write!(
                f,
                "Embedding service returned {} vectors for {} texts",
                actual, expected
            ),
        }
    }
}

impl std::error::Error for VectorIndexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VectorIndexError::EmbeddingError(e) => Some(e),
            VectorIndexError::StoreError(e) => Some(e),
            VectorIndexError::EmbeddingCountMismatch { .. } => None,
        }
    }
}

impl From<EmbeddingProviderError> for VectorIndexError {
    fn from(error: EmbeddingProviderError) -> Self {
        VectorIndexError::EmbeddingError(error)
    }
}

impl From<VectorStoreError> for VectorIndexError {
    fn from(error: VectorStoreError) -> Self {
        VectorIndexError::StoreError(error)
    }
}

/// A vector store paired with the embedding model that fills it.
pub struct VectorIndex {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
}

impl VectorIndex {
    pub fn new(embedding_provider: Arc<dyn EmbeddingProvider>, store: Arc<dyn VectorStore>) -> Self {
        Self {
            embedding_provider,
            store,
        }
    }

    pub async fn add_chunks(&self, chunks: Vec<Chunk>) -> Result<Vec<String>, VectorIndexError> {
        if chunks.is_empty() {
            return Ok(Vec::new());
        }

        let texts: Vec<String> = chunks.iter().map(|chunk| chunk.text().to_string()).collect();
        tracing::debug!(
            "Embedding {} chunks with {}",
            texts.len(),
            self.embedding_provider.model_name()
        );
        let embeddings = self.embedding_provider.embed_documents(&texts).await?;

        if embeddings.len() != chunks.len() {
            return Err(VectorIndexError::EmbeddingCountMismatch {
                expected: chunks.len(),
                actual: embeddings.len(),
            });
        }

        let entries: Vec<EmbeddedChunk> = chunks
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(position, (chunk, embedding))| EmbeddedChunk {
                id: chunk_id(&chunk, position),
                chunk,
                embedding,
            })
            .collect();

        Ok(self.store.add(entries).await?)
    }

    pub async fn similarity_search(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<Chunk>, VectorIndexError> {
        let query_vector = self.embedding_provider.embed_query(query).await?;
        let results = self.store.similarity_search(&query_vector, k).await?;

        Ok(results.into_iter().map(|scored| scored.chunk).collect())
    }

    /// Collection-level delete by metadata filter.
    pub async fn delete_where(&self, filter: &MetadataFilter) -> Result<usize, VectorStoreError> {
        self.store.delete_where(filter).await
    }

    /// Id-based delete: resolve matching ids first, then remove them.
    pub async fn delete_matching(&self, filter: &MetadataFilter) -> Result<usize, VectorStoreError> {
        let ids = self.store.ids_where(filter).await?;
        if ids.is_empty() {
            return Ok(0);
        }
        self.store.delete_ids(&ids).await
    }

    pub async fn persist(&self) -> Result<(), VectorStoreError> {
        self.store.persist().await
    }

    pub async fn count(&self) -> Result<usize, VectorStoreError> {
        self.store.count().await
    }

    pub fn as_retriever(self: &Arc<Self>, k: usize) -> Retriever {
        Retriever {
            index: Arc::clone(self),
            k,
        }
    }
}

/// Stable id for a chunk: same file, position and text always hash the same.
fn chunk_id(chunk: &Chunk, position: usize) -> String {
    let mut hasher = Sha256::new();
    if let Some(file_id) = chunk.file_id() {
        hasher.update(file_id.to_le_bytes());
    }
    hasher.update((position as u64).to_le_bytes());
    hasher.update(chunk.text().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Top-k lookup bound to a [`VectorIndex`].
#[derive(Clone)]
pub struct Retriever {
    index: Arc<VectorIndex>,
    k: usize,
}

impl Retriever {
    pub fn k(&self) -> usize {
        self.k
    }

    pub async fn retrieve(&self, query: &str) -> Result<Vec<Chunk>, VectorIndexError> {
        self.index.similarity_search(query, self.k).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ChunkMetadata;
    use crate::infrastructure::vector_store::LocalVectorStore;
    use crate::testing::HashEmbeddingProvider;

    fn chunk(text: &str, file_id: i32) -> Chunk {
        let mut metadata = ChunkMetadata::new();
        metadata.set_file_id(file_id);
        Chunk::new(text.to_string(), metadata)
    }

    fn index() -> (tempfile::TempDir, Arc<VectorIndex>) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalVectorStore::open(dir.path()).unwrap();
        let index = VectorIndex::new(Arc::new(HashEmbeddingProvider::default()), Arc::new(store));
        (dir, Arc::new(index))
    }

    #[tokio::test]
    async fn test_add_and_retrieve_nearest_first() {
        let (_dir, index) = index();
        index
            .add_chunks(vec![
                chunk("rust ownership and borrowing", 1),
                chunk("baking sourdough bread at home", 1),
                chunk("tokio async runtime internals", 2),
            ])
            .await
            .unwrap();

        let retriever = index.as_retriever(2);
        let results = retriever.retrieve("baking sourdough bread").await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].text(), "baking sourdough bread at home");
    }

    #[tokio::test]
    async fn test_chunk_ids_are_stable() {
        let a = chunk("same text", 1);
        let b = chunk("same text", 1);
        let other_file = chunk("same text", 2);

        assert_eq!(chunk_id(&a, 0), chunk_id(&b, 0));
        assert_ne!(chunk_id(&a, 0), chunk_id(&a, 1));
        assert_ne!(chunk_id(&a, 0), chunk_id(&other_file, 0));
        assert_eq!(chunk_id(&a, 0).len(), 64);
    }

    #[tokio::test]
    async fn test_both_delete_paths_remove_only_matching_file() {
        let (_dir, index) = index();
        index
            .add_chunks(vec![chunk("one", 1), chunk("two", 1), chunk("three", 2)])
            .await
            .unwrap();

        assert_eq!(index.delete_where(&MetadataFilter::file_id(1)).await.unwrap(), 2);
        assert_eq!(index.count().await.unwrap(), 1);

        assert_eq!(index.delete_matching(&MetadataFilter::file_id(2)).await.unwrap(), 1);
        assert_eq!(index.count().await.unwrap(), 0);

        assert_eq!(index.delete_matching(&MetadataFilter::file_id(2)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_adding_nothing_is_a_no_op() {
        let (_dir, index) = index();
        assert!(index.add_chunks(Vec::new()).await.unwrap().is_empty());
        assert_eq!(index.count().await.unwrap(), 0);
    }
}
