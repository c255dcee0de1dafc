use std::sync::Arc;
use uuid::Uuid;

use crate::application::ports::ChatMessage;
use crate::application::services::{RagPipelineBuilder, RagPipelineError};
use crate::domain::entities::ChatLogEntry;
use crate::domain::repositories::{ChatLogRepository, ChatLogRepositoryError};
use crate::domain::value_objects::ModelName;

#[derive(Debug)]
pub enum ChatError {
    PipelineError(RagPipelineError),
    RepositoryError(String),
}

impl std::fmt::Display for ChatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatError::PipelineError(e) => write!(f, "Pipeline error: {}", e),
            ChatError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for ChatError {}

impl From<RagPipelineError> for ChatError {
    fn from(error: RagPipelineError) -> Self {
        ChatError::PipelineError(error)
    }
}

impl From<ChatLogRepositoryError> for ChatError {
    fn from(error: ChatLogRepositoryError) -> Self {
        ChatError::RepositoryError(error.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub question: String,
    pub session_id: Option<String>,
    pub model: ModelName,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatResponse {
    pub answer: String,
    pub session_id: String,
    pub model: ModelName,
}

pub struct ChatUseCase {
    chat_log_repository: Arc<dyn ChatLogRepository>,
    pipeline: Arc<RagPipelineBuilder>,
}

impl ChatUseCase {
    pub fn new(
        chat_log_repository: Arc<dyn ChatLogRepository>,
        pipeline: Arc<RagPipelineBuilder>,
    ) -> Self {
        Self {
            chat_log_repository,
            pipeline,
        }
    }

    pub async fn execute(&self, request: ChatRequest) -> Result<ChatResponse, ChatError> {
        let session_id = match request.session_id {
            Some(id) if !id.is_empty() => id,
            _ => Uuid::new_v4().to_string(),
        };

        tracing::info!(
            "Session: {}, Question: {}, Model: {}",
            session_id,
            request.question,
            request.model
        );

        let history = self.chat_history(&session_id).await?;

        let chain = self.pipeline.build(request.model)?;
        let output = chain.invoke(&request.question, &history).await?;

        // Only answered turns are logged.
        let entry = ChatLogEntry::new(
            session_id.clone(),
            request.question,
            output.answer.clone(),
            request.model,
        );
        self.chat_log_repository.insert(&entry).await?;

        tracing::info!("Session: {}, Answer: {}", session_id, output.answer);

        Ok(ChatResponse {
            answer: output.answer,
            session_id,
            model: request.model,
        })
    }

    async fn chat_history(&self, session_id: &str) -> Result<Vec<ChatMessage>, ChatError> {
        let entries = self.chat_log_repository.history(session_id).await?;

        Ok(entries
            .iter()
            .flat_map(|entry| {
                [
                    ChatMessage::human(entry.question()),
                    ChatMessage::ai(entry.answer()),
                ]
            })
            .collect())
    }
}
