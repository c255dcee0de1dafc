use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::value_objects::ModelName;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    System,
    Human,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn human(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Human,
            content: content.into(),
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Ai,
            content: content.into(),
        }
    }
}

#[derive(Debug)]
pub enum ChatModelError {
    /// The client could not be constructed, e.g. missing credentials.
    Configuration(String),
    NetworkError(String),
    ApiError(String),
    EmptyResponse,
}

impl std::fmt::Display for ChatModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatModelError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            ChatModelError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            ChatModelError::ApiError(msg) => write!(f, "API error: {}", msg),
            ChatModelError::EmptyResponse => write!(f, "Model returned no candidates"),
        }
    }
}

impl std::error::Error for ChatModelError {}

#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn generate(&self, messages: &[ChatMessage]) -> Result<String, ChatModelError>;

    fn model_name(&self) -> ModelName;
}

pub trait ChatModelFactory: Send + Sync {
    fn create(&self, model: ModelName) -> Result<Arc<dyn ChatModel>, ChatModelError>;
}
