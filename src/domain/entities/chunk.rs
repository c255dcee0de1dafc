use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ChunkMetadata;

/// Raw text produced by a loader, before splitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    text: String,
    metadata: ChunkMetadata,
}

impl SourceDocument {
    pub fn new(text: String, metadata: ChunkMetadata) -> Self {
        Self { text, metadata }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn metadata(&self) -> &ChunkMetadata {
        &self.metadata
    }
}

/// The unit of retrieval. Never mutated once handed to the vector index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    text: String,
    metadata: ChunkMetadata,
}

impl Chunk {
    pub fn new(text: String, metadata: ChunkMetadata) -> Self {
        Self { text, metadata }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn metadata(&self) -> &ChunkMetadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut ChunkMetadata {
        &mut self.metadata
    }

    pub fn file_id(&self) -> Option<i32> {
        self.metadata.file_id()
    }
}
