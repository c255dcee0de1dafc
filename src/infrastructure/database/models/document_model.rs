use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;

use crate::domain::entities::DocumentRecord;
use crate::infrastructure::database::schema::document_store;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Identifiable)]
#[diesel(table_name = document_store)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DocumentModel {
    pub id: i32,
    pub filename: String,
    pub upload_timestamp: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = document_store)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewDocumentModel<'a> {
    pub filename: &'a str,
    pub upload_timestamp: DateTime<Utc>,
}

impl From<DocumentModel> for DocumentRecord {
    fn from(model: DocumentModel) -> Self {
        DocumentRecord::new(model.id, model.filename, model.upload_timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_to_record() {
        let now = Utc::now();
        let record = DocumentRecord::from(DocumentModel {
            id: 5,
            filename: "report.pdf".to_string(),
            upload_timestamp: now,
        });

        assert_eq!(record.id(), 5);
        assert_eq!(record.filename(), "report.pdf");
        assert_eq!(record.upload_timestamp(), now);
    }
}
