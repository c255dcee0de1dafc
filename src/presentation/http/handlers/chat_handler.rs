use axum::{Json, extract::State, extract::rejection::JsonRejection};
use std::sync::Arc;

use crate::application::use_cases::ChatUseCase;
use crate::presentation::http::dto::{ChatRequestDto, ChatResponseDto};
use crate::presentation::http::errors::ApiError;

pub struct ChatHandler {
    chat_use_case: Arc<ChatUseCase>,
}

impl ChatHandler {
    pub fn new(chat_use_case: Arc<ChatUseCase>) -> Self {
        Self { chat_use_case }
    }

    pub async fn chat(
        State(handler): State<Arc<ChatHandler>>,
        payload: Result<Json<ChatRequestDto>, JsonRejection>,
    ) -> Result<Json<ChatResponseDto>, ApiError> {
        let Json(request) = payload?;

        let response = handler
            .chat_use_case
            .execute(request.into())
            .await
            .map_err(|e| {
                tracing::error!("Chat failed: {}", e);
                ApiError::from(e)
            })?;

        Ok(Json(ChatResponseDto::from(response)))
    }
}
