use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An uploaded file as tracked by the relational store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    id: i32,
    filename: String,
    upload_timestamp: DateTime<Utc>,
}

impl DocumentRecord {
    pub fn new(id: i32, filename: String, upload_timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            filename,
            upload_timestamp,
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn upload_timestamp(&self) -> DateTime<Utc> {
        self.upload_timestamp
    }
}
