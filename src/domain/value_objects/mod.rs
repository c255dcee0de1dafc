pub mod chunk_metadata;
pub mod document_format;
pub mod model_name;

pub use chunk_metadata::ChunkMetadata;
pub use document_format::{DocumentFormat, UnsupportedFileType};
pub use model_name::ModelName;
