use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::application::ports::{
    EmbeddedChunk, MetadataFilter, ScoredChunk, VectorStore, VectorStoreError,
};

const COLLECTION_FILE: &str = "collection.json";
const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct CollectionFile {
    version: u32,
    entries: Vec<EmbeddedChunk>,
}

/// Whole collection in memory, flushed to one JSON file on `persist`.
pub struct LocalVectorStore {
    file_path: PathBuf,
    entries: RwLock<Vec<EmbeddedChunk>>,
    // Held across snapshot, write and rename so an older snapshot never lands last.
    persist_lock: Mutex<()>,
}

fn poisoned() -> VectorStoreError {
    VectorStoreError::StorageError("Vector store lock poisoned".to_string())
}

impl LocalVectorStore {
    /// Opens (or creates) the collection stored under `directory`.
    pub fn open(directory: &Path) -> Result<Self, VectorStoreError> {
        std::fs::create_dir_all(directory).map_err(|e| {
            VectorStoreError::StorageError(format!("{}: {}", directory.display(), e))
        })?;

        let file_path = directory.join(COLLECTION_FILE);
        let entries = if file_path.exists() {
            let bytes = std::fs::read(&file_path)
                .map_err(|e| VectorStoreError::StorageError(e.to_string()))?;
            let collection: CollectionFile = serde_json::from_slice(&bytes)
                .map_err(|e| VectorStoreError::SerializationError(e.to_string()))?;
            if collection.version != FORMAT_VERSION {
                return Err(VectorStoreError::SerializationError(format!(
                    "Unsupported collection version {}",
                    collection.version
                )));
            }
            collection.entries
        } else {
            Vec::new()
        };

        tracing::info!(
            "Opened local vector store at {} ({} entries)",
            file_path.display(),
            entries.len()
        );

        Ok(Self {
            file_path,
            entries: RwLock::new(entries),
            persist_lock: Mutex::new(()),
        })
    }

    fn snapshot(&self) -> Result<Vec<u8>, VectorStoreError> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        let collection = CollectionFile {
            version: FORMAT_VERSION,
            entries: entries.clone(),
        };
        serde_json::to_vec(&collection)
            .map_err(|e| VectorStoreError::SerializationError(e.to_string()))
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[async_trait]
impl VectorStore for LocalVectorStore {
    async fn add(&self, new_entries: Vec<EmbeddedChunk>) -> Result<Vec<String>, VectorStoreError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;

        let dimension = entries
            .first()
            .or_else(|| new_entries.first())
            .map(|entry| entry.embedding.len());
        if let Some(dimension) = dimension {
            if let Some(bad) = new_entries.iter().find(|e| e.embedding.len() != dimension) {
                return Err(VectorStoreError::InvalidInput(format!(
                    "Embedding for {} has dimension {}, collection uses {}",
                    bad.id,
                    bad.embedding.len(),
                    dimension
                )));
            }
        }

        let mut ids = Vec::with_capacity(new_entries.len());
        for entry in new_entries {
            ids.push(entry.id.clone());
            match entries.iter_mut().find(|existing| existing.id == entry.id) {
                Some(existing) => *existing = entry,
                None => entries.push(entry),
            }
        }

        Ok(ids)
    }

    async fn similarity_search(
        &self,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredChunk>, VectorStoreError> {
        let entries = self.entries.read().map_err(|_| poisoned())?;

        let mut scored: Vec<ScoredChunk> = entries
            .iter()
            .filter(|entry| entry.embedding.len() == query.len())
            .map(|entry| ScoredChunk {
                chunk: entry.chunk.clone(),
                score: cosine_similarity(query, &entry.embedding),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);

        Ok(scored)
    }

    async fn delete_where(&self, filter: &MetadataFilter) -> Result<usize, VectorStoreError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        let before = entries.len();
        entries.retain(|entry| !filter.matches(entry.chunk.metadata()));
        Ok(before - entries.len())
    }

    async fn ids_where(&self, filter: &MetadataFilter) -> Result<Vec<String>, VectorStoreError> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries
            .iter()
            .filter(|entry| filter.matches(entry.chunk.metadata()))
            .map(|entry| entry.id.clone())
            .collect())
    }

    async fn delete_ids(&self, ids: &[String]) -> Result<usize, VectorStoreError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        let before = entries.len();
        entries.retain(|entry| !ids.contains(&entry.id));
        Ok(before - entries.len())
    }

    async fn persist(&self) -> Result<(), VectorStoreError> {
        let _guard = self.persist_lock.lock().await;

        let bytes = self.snapshot()?;
        let tmp_path = self
            .file_path
            .with_extension(format!("json.{}.tmp", Uuid::new_v4()));

        if let Err(e) = tokio::fs::write(&tmp_path, &bytes).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(VectorStoreError::StorageError(e.to_string()));
        }
        if let Err(e) = tokio::fs::rename(&tmp_path, &self.file_path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(VectorStoreError::StorageError(e.to_string()));
        }

        tracing::debug!("Persisted vector store to {}", self.file_path.display());
        Ok(())
    }

    async fn count(&self) -> Result<usize, VectorStoreError> {
        Ok(self.entries.read().map_err(|_| poisoned())?.len())
    }
}
