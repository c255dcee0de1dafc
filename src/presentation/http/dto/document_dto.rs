use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::use_cases::UploadDocumentResponse;
use crate::domain::entities::DocumentRecord;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct DocumentInfoDto {
    pub id: i32,
    pub filename: String,
    pub upload_timestamp: DateTime<Utc>,
}

impl From<DocumentRecord> for DocumentInfoDto {
    fn from(record: DocumentRecord) -> Self {
        Self {
            id: record.id(),
            filename: record.filename().to_string(),
            upload_timestamp: record.upload_timestamp(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteFileRequestDto {
    pub file_id: i32,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct UploadResponseDto {
    pub message: String,
    pub file_id: i32,
}

impl From<UploadDocumentResponse> for UploadResponseDto {
    fn from(response: UploadDocumentResponse) -> Self {
        Self {
            message: format!("Uploaded and indexed {}", response.file_name),
            file_id: response.file_id,
        }
    }
}
