use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::Text;
use pgvector::{Vector, VectorExpressionMethods};

use crate::application::ports::{
    EmbeddedChunk, MetadataFilter, ScoredChunk, VectorStore, VectorStoreError,
};
use crate::domain::entities::Chunk;
use crate::domain::value_objects::chunk_metadata::FILE_ID_KEY;
use crate::infrastructure::database::models::{ChunkModel, NewChunkModel};
use crate::infrastructure::database::schema::document_chunks::dsl::*;
use crate::infrastructure::database::{DbPool, get_connection_from_pool};
use crate::infrastructure::vector_store::local_vector_store::cosine_similarity;

// Aliased so the row field does not collide with the `id` column in scope.
const IDS_BY_METADATA_SQL: &str =
    "SELECT id AS chunk_id FROM document_chunks WHERE metadata ->> $1 = $2";

#[derive(QueryableByName)]
struct ChunkIdRow {
    #[diesel(sql_type = Text)]
    chunk_id: String,
}

/// Chunks and their vectors in the `document_chunks` table (pgvector).
pub struct PgVectorStore {
    pool: DbPool,
}

impl PgVectorStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn storage_error(e: impl std::fmt::Display) -> VectorStoreError {
    VectorStoreError::StorageError(e.to_string())
}

/// The `file_id` column can only serve filters on that key with an integer value.
fn file_id_filter(filter: &MetadataFilter) -> Option<i32> {
    if filter.key != FILE_ID_KEY {
        return None;
    }
    filter.value.as_i64().and_then(|v| i32::try_from(v).ok())
}

#[async_trait]
impl VectorStore for PgVectorStore {
    async fn add(&self, entries: Vec<EmbeddedChunk>) -> Result<Vec<String>, VectorStoreError> {
        let mut conn = get_connection_from_pool(&self.pool).map_err(storage_error)?;

        let rows: Vec<NewChunkModel> = entries.iter().map(NewChunkModel::from).collect();

        diesel::insert_into(document_chunks)
            .values(&rows)
            .on_conflict(id)
            .do_nothing()
            .execute(&mut conn)
            .map_err(storage_error)?;

        Ok(entries.into_iter().map(|entry| entry.id).collect())
    }

    async fn similarity_search(
        &self,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredChunk>, VectorStoreError> {
        let mut conn = get_connection_from_pool(&self.pool).map_err(storage_error)?;

        let models = document_chunks
            .order(embedding.cosine_distance(Vector::from(query.to_vec())))
            .limit(k as i64)
            .select(ChunkModel::as_select())
            .load::<ChunkModel>(&mut conn)
            .map_err(storage_error)?;

        models
            .into_iter()
            .map(|row| {
                let score = cosine_similarity(query, row.embedding.as_slice());
                Chunk::try_from(row)
                    .map(|chunk| ScoredChunk { chunk, score })
                    .map_err(VectorStoreError::SerializationError)
            })
            .collect()
    }

    async fn delete_where(&self, filter: &MetadataFilter) -> Result<usize, VectorStoreError> {
        let target = file_id_filter(filter).ok_or_else(|| {
            VectorStoreError::Unsupported(format!(
                "Column delete only supports integer {} filters",
                FILE_ID_KEY
            ))
        })?;

        let mut conn = get_connection_from_pool(&self.pool).map_err(storage_error)?;

        diesel::delete(document_chunks.filter(file_id.eq(target)))
            .execute(&mut conn)
            .map_err(storage_error)
    }

    async fn ids_where(&self, filter: &MetadataFilter) -> Result<Vec<String>, VectorStoreError> {
        let mut conn = get_connection_from_pool(&self.pool).map_err(storage_error)?;

        let rows = diesel::sql_query(IDS_BY_METADATA_SQL)
            .bind::<Text, _>(filter.key.as_str())
            .bind::<Text, _>(filter.value_as_text())
            .load::<ChunkIdRow>(&mut conn)
            .map_err(storage_error)?;

        Ok(rows.into_iter().map(|row| row.chunk_id).collect())
    }

    async fn delete_ids(&self, ids: &[String]) -> Result<usize, VectorStoreError> {
        let mut conn = get_connection_from_pool(&self.pool).map_err(storage_error)?;

        diesel::delete(document_chunks.filter(id.eq_any(ids)))
            .execute(&mut conn)
            .map_err(storage_error)
    }

    async fn persist(&self) -> Result<(), VectorStoreError> {
        // Every statement is already committed.
        Ok(())
    }

    async fn count(&self) -> Result<usize, VectorStoreError> {
        let mut conn = get_connection_from_pool(&self.pool).map_err(storage_error)?;

        let total: i64 = document_chunks
            .count()
            .get_result(&mut conn)
            .map_err(storage_error)?;

        Ok(total as usize)
    }
}
