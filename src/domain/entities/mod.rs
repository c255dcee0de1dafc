pub mod chat_log;
pub mod chunk;
pub mod document_record;

pub use chat_log::ChatLogEntry;
pub use chunk::{Chunk, SourceDocument};
pub use document_record::DocumentRecord;
