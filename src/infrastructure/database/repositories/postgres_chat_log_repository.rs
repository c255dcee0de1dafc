use async_trait::async_trait;
use diesel::prelude::*;

use crate::domain::entities::ChatLogEntry;
use crate::domain::repositories::{ChatLogRepository, ChatLogRepositoryError};
use crate::infrastructure::database::models::{ChatLogModel, NewChatLogModel};
use crate::infrastructure::database::schema::application_logs::dsl::*;
use crate::infrastructure::database::{DbPool, get_connection_from_pool};

pub struct PostgresChatLogRepository {
    pool: DbPool,
}

impl PostgresChatLogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatLogRepository for PostgresChatLogRepository {
    async fn insert(&self, entry: &ChatLogEntry) -> Result<(), ChatLogRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| ChatLogRepositoryError::DatabaseError(e.to_string()))?;

        diesel::insert_into(application_logs)
            .values(&NewChatLogModel::from(entry))
            .execute(&mut conn)
            .map_err(|e| ChatLogRepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn history(&self, session: &str) -> Result<Vec<ChatLogEntry>, ChatLogRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| ChatLogRepositoryError::DatabaseError(e.to_string()))?;

        let models = application_logs
            .filter(session_id.eq(session))
            .order((created_at.asc(), id.asc()))
            .select(ChatLogModel::as_select())
            .load::<ChatLogModel>(&mut conn)
            .map_err(|e| ChatLogRepositoryError::DatabaseError(e.to_string()))?;

        rows_to_entries(models)
    }
}

// Column names are in scope here; closures bind `row` to avoid shadowing them.
fn rows_to_entries(rows: Vec<ChatLogModel>) -> Result<Vec<ChatLogEntry>, ChatLogRepositoryError> {
    rows.into_iter()
        .map(|row| ChatLogEntry::try_from(row).map_err(ChatLogRepositoryError::ValidationError))
        .collect()
}
