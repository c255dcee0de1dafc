use axum::{
    Json,
    extract::{multipart::MultipartRejection, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::application::use_cases::{ChatError, ListDocumentsError, UploadDocumentError};
use crate::domain::value_objects::document_format::ALLOWED_EXTENSIONS;
use crate::presentation::http::dto::ErrorDetailDto;

/// Failure surfaced to clients as `{"detail": ...}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(String),
    Unprocessable(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            ApiError::BadRequest(detail)
            | ApiError::Unprocessable(detail)
            | ApiError::Internal(detail) => detail,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status(), self.detail())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorDetailDto {
            detail: self.detail().to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Unprocessable(rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<UploadDocumentError> for ApiError {
    fn from(error: UploadDocumentError) -> Self {
        match error {
            UploadDocumentError::UnsupportedFileType(_) => ApiError::BadRequest(format!(
                "Unsupported file type. Allowed: {}",
                ALLOWED_EXTENSIONS.join(", ")
            )),
            UploadDocumentError::ValidationError(msg) => ApiError::Unprocessable(msg),
            UploadDocumentError::IndexingFailed(filename) => {
                ApiError::Internal(format!("Failed to index {}", filename))
            }
            e @ (UploadDocumentError::StorageError(_) | UploadDocumentError::RepositoryError(_)) => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl From<ChatError> for ApiError {
    fn from(error: ChatError) -> Self {
        ApiError::Internal(error.to_string())
    }
}

impl From<ListDocumentsError> for ApiError {
    fn from(error: ListDocumentsError) -> Self {
        ApiError::Internal(error.to_string())
    }
}
