pub mod chat;
pub mod delete_document;
pub mod list_documents;
pub mod upload_document;

pub use chat::{ChatError, ChatRequest, ChatResponse, ChatUseCase};
pub use delete_document::{DeleteDocumentOutcome, DeleteDocumentUseCase};
pub use list_documents::{ListDocumentsError, ListDocumentsUseCase};
pub use upload_document::{
    UploadDocumentError, UploadDocumentRequest, UploadDocumentResponse, UploadDocumentUseCase,
};
