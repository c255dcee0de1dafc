pub mod chat_model;
pub mod document_loader;
pub mod embedding_provider;
pub mod file_storage;
pub mod vector_store;

pub use chat_model::{ChatMessage, ChatModel, ChatModelError, ChatModelFactory, MessageRole};
pub use document_loader::{DocumentLoadError, DocumentLoader};
pub use embedding_provider::{EmbeddingProvider, EmbeddingProviderError};
pub use file_storage::{FileStorage, FileStorageError, TempFile};
pub use vector_store::{EmbeddedChunk, MetadataFilter, ScoredChunk, VectorStore, VectorStoreError};
