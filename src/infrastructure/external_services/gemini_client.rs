use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::application::ports::{
    ChatMessage, ChatModel, ChatModelError, ChatModelFactory, MessageRole,
};
use crate::domain::value_objects::ModelName;
use crate::infrastructure::config::LlmConfig;

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}

fn text_content(role: Option<&str>, text: String) -> GeminiContent {
    GeminiContent {
        role: role.map(str::to_string),
        parts: vec![GeminiPart { text: Some(text) }],
    }
}

fn build_request(messages: &[ChatMessage]) -> GenerateContentRequest {
    let system_text = messages
        .iter()
        .filter(|message| message.role == MessageRole::System)
        .map(|message| message.content.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    let contents = messages
        .iter()
        .filter_map(|message| match message.role {
            MessageRole::System => None,
            MessageRole::Human => Some(text_content(Some("user"), message.content.clone())),
            MessageRole::Ai => Some(text_content(Some("model"), message.content.clone())),
        })
        .collect();

    GenerateContentRequest {
        contents,
        system_instruction: if system_text.is_empty() {
            None
        } else {
            Some(text_content(None, system_text))
        },
    }
}

fn extract_answer(response: GenerateContentResponse) -> Result<String, ChatModelError> {
    let content = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .ok_or(ChatModelError::EmptyResponse)?;

    Ok(content
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .collect::<Vec<_>>()
        .join(""))
}

pub struct GeminiChatModel {
    client: Client,
    endpoint: Url,
    model: ModelName,
}

impl GeminiChatModel {
    pub fn new(
        client: Client,
        api_base: &str,
        api_key: &str,
        model: ModelName,
    ) -> Result<Self, ChatModelError> {
        let mut endpoint = Url::parse(&format!(
            "{}/models/{}:generateContent",
            api_base.trim_end_matches('/'),
            model
        ))
        .map_err(|e| ChatModelError::Configuration(format!("Invalid Gemini API base: {}", e)))?;
        endpoint.query_pairs_mut().append_pair("key", api_key);

        Ok(Self {
            client,
            endpoint,
            model,
        })
    }
}

#[async_trait]
impl ChatModel for GeminiChatModel {
    async fn generate(&self, messages: &[ChatMessage]) -> Result<String, ChatModelError> {
        let payload = build_request(messages);

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| ChatModelError::NetworkError(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ChatModelError::ApiError(format!(
                "Gemini API error ({}): {}",
                status, error_text
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ChatModelError::ApiError(format!("Invalid Gemini response: {}", e)))?;

        extract_answer(body)
    }

    fn model_name(&self) -> ModelName {
        self.model
    }
}

/// Builds [`GeminiChatModel`]s that share one HTTP client.
pub struct GeminiChatModelFactory {
    client: Client,
    api_key: Option<String>,
    api_base: String,
}

impl GeminiChatModelFactory {
    pub fn from_config(config: &LlmConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            api_base: config.api_base.clone(),
        })
    }
}

impl ChatModelFactory for GeminiChatModelFactory {
    fn create(&self, model: ModelName) -> Result<Arc<dyn ChatModel>, ChatModelError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ChatModelError::Configuration("GOOGLE_API_KEY is not set".to_string())
        })?;

        Ok(Arc::new(GeminiChatModel::new(
            self.client.clone(),
            &self.api_base,
            api_key,
            model,
        )?))
    }
}
