pub mod chat_log_model;
pub mod chunk_model;
pub mod document_model;

pub use chat_log_model::*;
pub use chunk_model::*;
pub use document_model::*;
