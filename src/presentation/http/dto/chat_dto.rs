use serde::{Deserialize, Serialize};

use crate::application::use_cases::{ChatRequest, ChatResponse};
use crate::domain::value_objects::ModelName;

#[derive(Debug, Deserialize)]
pub struct ChatRequestDto {
    pub question: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub model: ModelName,
}

impl From<ChatRequestDto> for ChatRequest {
    fn from(dto: ChatRequestDto) -> Self {
        Self {
            question: dto.question,
            session_id: dto.session_id,
            model: dto.model,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatResponseDto {
    pub answer: String,
    pub session_id: String,
    pub model: ModelName,
}

impl From<ChatResponse> for ChatResponseDto {
    fn from(response: ChatResponse) -> Self {
        Self {
            answer: response.answer,
            session_id: response.session_id,
            model: response.model,
        }
    }
}
