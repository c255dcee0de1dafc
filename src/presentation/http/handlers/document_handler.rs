use axum::{
    Json,
    extract::{
        Multipart, State,
        multipart::MultipartRejection,
        rejection::JsonRejection,
    },
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::application::use_cases::{
    DeleteDocumentOutcome, DeleteDocumentUseCase, ListDocumentsUseCase, UploadDocumentRequest,
    UploadDocumentUseCase,
};
use crate::presentation::http::dto::{
    DeleteFileRequestDto, DocumentInfoDto, ErrorMessageDto, MessageResponseDto, UploadResponseDto,
};
use crate::presentation::http::errors::ApiError;

const FILE_FIELD: &str = "file";

pub struct DocumentHandler {
    upload_use_case: Arc<UploadDocumentUseCase>,
    list_documents_use_case: Arc<ListDocumentsUseCase>,
    delete_document_use_case: Arc<DeleteDocumentUseCase>,
}

impl DocumentHandler {
    pub fn new(
        upload_use_case: Arc<UploadDocumentUseCase>,
        list_documents_use_case: Arc<ListDocumentsUseCase>,
        delete_document_use_case: Arc<DeleteDocumentUseCase>,
    ) -> Self {
        Self {
            upload_use_case,
            list_documents_use_case,
            delete_document_use_case,
        }
    }

    pub async fn upload_document(
        State(handler): State<Arc<DocumentHandler>>,
        multipart: Result<Multipart, MultipartRejection>,
    ) -> Result<Json<UploadResponseDto>, ApiError> {
        let request = read_upload(multipart?).await?;
        tracing::info!(
            "Upload of {} ({} bytes)",
            request.file_name,
            request.file_data.len()
        );

        let response = handler.upload_use_case.execute(request).await.map_err(|e| {
            tracing::error!("Upload failed: {}", e);
            ApiError::from(e)
        })?;

        Ok(Json(UploadResponseDto::from(response)))
    }

    pub async fn list_documents(
        State(handler): State<Arc<DocumentHandler>>,
    ) -> Result<Json<Vec<DocumentInfoDto>>, ApiError> {
        let documents = handler.list_documents_use_case.execute().await?;

        Ok(Json(
            documents.into_iter().map(DocumentInfoDto::from).collect(),
        ))
    }

    pub async fn delete_document(
        State(handler): State<Arc<DocumentHandler>>,
        payload: Result<Json<DeleteFileRequestDto>, JsonRejection>,
    ) -> Result<Response, ApiError> {
        let Json(request) = payload?;
        let file_id = request.file_id;

        let response = match handler.delete_document_use_case.execute(file_id).await {
            DeleteDocumentOutcome::Deleted => Json(MessageResponseDto {
                message: format!("Deleted document {}", file_id),
            })
            .into_response(),
            DeleteDocumentOutcome::RecordDeletionFailed => Json(ErrorMessageDto {
                error: "Deleted from Chroma but DB failed".to_string(),
            })
            .into_response(),
            DeleteDocumentOutcome::IndexDeletionFailed => Json(ErrorMessageDto {
                error: format!("Failed to delete document {}", file_id),
            })
            .into_response(),
        };

        Ok(response)
    }
}

/// Takes the `file` field, or failing that the first field that carries a file name.
async fn read_upload(mut multipart: Multipart) -> Result<UploadDocumentRequest, ApiError> {
    let mut fallback: Option<UploadDocumentRequest> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        let is_file_field = field.name() == Some(FILE_FIELD);
        if !is_file_field && (fallback.is_some() || field.file_name().is_none()) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let file_data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?
            .to_vec();
        let request = UploadDocumentRequest {
            file_name,
            file_data,
        };

        if is_file_field {
            return Ok(request);
        }
        fallback = Some(request);
    }

    fallback.ok_or_else(|| ApiError::Unprocessable("Field required: file".to_string()))
}
