use chrono::{DateTime, Utc};
use diesel::prelude::*;
use pgvector::Vector;

use crate::application::ports::EmbeddedChunk;
use crate::domain::entities::Chunk;
use crate::domain::value_objects::ChunkMetadata;
use crate::infrastructure::database::schema::document_chunks;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = document_chunks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChunkModel {
    pub id: String,
    pub file_id: Option<i32>,
    pub content: String,
    pub metadata: serde_json::Value,
    pub embedding: Vector,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = document_chunks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewChunkModel {
    pub id: String,
    pub file_id: Option<i32>,
    pub content: String,
    pub metadata: serde_json::Value,
    pub embedding: Vector,
}

impl From<&EmbeddedChunk> for NewChunkModel {
    fn from(entry: &EmbeddedChunk) -> Self {
        Self {
            id: entry.id.clone(),
            file_id: entry.chunk.file_id(),
            content: entry.chunk.text().to_string(),
            metadata: entry.chunk.metadata().clone().into(),
            embedding: Vector::from(entry.embedding.clone()),
        }
    }
}

impl TryFrom<ChunkModel> for Chunk {
    type Error = String;

    fn try_from(model: ChunkModel) -> Result<Self, Self::Error> {
        let metadata = ChunkMetadata::try_from(model.metadata)
            .map_err(|e| format!("Invalid metadata: {}", e))?;

        Ok(Chunk::new(model.content, metadata))
    }
}
