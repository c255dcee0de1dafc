pub mod document_loaders;
pub mod gemini_client;
pub mod inference_client;

pub use document_loaders::CompositeDocumentLoader;
pub use gemini_client::GeminiChatModelFactory;
pub use inference_client::InferenceEmbeddingProvider;
