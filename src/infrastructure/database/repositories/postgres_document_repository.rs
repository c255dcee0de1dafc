use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;

use crate::domain::entities::DocumentRecord;
use crate::domain::repositories::{DocumentRepository, DocumentRepositoryError};
use crate::infrastructure::database::models::{DocumentModel, NewDocumentModel};
use crate::infrastructure::database::schema::document_store::dsl::*;
use crate::infrastructure::database::{DbPool, get_connection_from_pool};

pub struct PostgresDocumentRepository {
    pool: DbPool,
}

impl PostgresDocumentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentRepository for PostgresDocumentRepository {
    async fn insert(&self, file_name: &str) -> Result<i32, DocumentRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| DocumentRepositoryError::DatabaseError(e.to_string()))?;

        let new_document = NewDocumentModel {
            filename: file_name,
            upload_timestamp: Utc::now(),
        };

        diesel::insert_into(document_store)
            .values(&new_document)
            .returning(id)
            .get_result(&mut conn)
            .map_err(|e| DocumentRepositoryError::DatabaseError(e.to_string()))
    }

    async fn find_all(&self) -> Result<Vec<DocumentRecord>, DocumentRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| DocumentRepositoryError::DatabaseError(e.to_string()))?;

        let models = document_store
            .order((upload_timestamp.desc(), id.desc()))
            .select(DocumentModel::as_select())
            .load::<DocumentModel>(&mut conn)
            .map_err(|e| DocumentRepositoryError::DatabaseError(e.to_string()))?;

        Ok(models.into_iter().map(DocumentRecord::from).collect())
    }

    async fn delete(&self, document_id: i32) -> Result<bool, DocumentRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| DocumentRepositoryError::DatabaseError(e.to_string()))?;

        let deleted_count = diesel::delete(document_store.find(document_id))
            .execute(&mut conn)
            .map_err(|e| DocumentRepositoryError::DatabaseError(e.to_string()))?;

        Ok(deleted_count > 0)
    }
}
