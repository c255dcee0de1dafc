pub mod chat_model_cache;
pub mod indexing_service;
pub mod rag_pipeline;
pub mod text_splitter;
pub mod vector_index;

pub use chat_model_cache::ChatModelCache;
pub use indexing_service::IndexingService;
pub use rag_pipeline::{RagPipelineBuilder, RagPipelineError};
pub use text_splitter::RecursiveCharacterSplitter;
pub use vector_index::VectorIndex;
