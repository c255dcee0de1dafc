use async_trait::async_trait;
use reqwest::{Client, Error as ReqwestError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{EmbeddingProvider, EmbeddingProviderError};
use crate::infrastructure::config::EmbeddingsConfig;

#[derive(Serialize)]
pub struct EmbeddingsRequest<'a> {
    pub text: TextInput,
    pub model: &'a str,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextInput {
    Single(String),
    Multiple(Vec<String>),
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingsResponse {
    pub embeddings: Vec<Vec<f32>>,
}

#[derive(Debug, Clone)]
pub struct EmbeddingsClientConfig {
    pub service_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl From<&EmbeddingsConfig> for EmbeddingsClientConfig {
    fn from(config: &EmbeddingsConfig) -> Self {
        Self {
            service_url: config.service_url.clone(),
            model: config.model.clone(),
            timeout_secs: config.timeout_secs,
        }
    }
}

#[derive(Debug)]
pub enum EmbeddingsError {
    RequestError(String),
    StatusError(u16, String),
    ParseError(String),
}

impl From<EmbeddingsError> for EmbeddingProviderError {
    fn from(error: EmbeddingsError) -> Self {
        match error {
            EmbeddingsError::RequestError(msg) => EmbeddingProviderError::NetworkError(msg),
            EmbeddingsError::StatusError(503, _) => EmbeddingProviderError::ServiceUnavailable,
            EmbeddingsError::StatusError(status, body) => {
                EmbeddingProviderError::ApiError(format!("HTTP {}: {}", status, body))
            }
            EmbeddingsError::ParseError(msg) => EmbeddingProviderError::ApiError(msg),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InferenceClient {
    client: Client,
    config: EmbeddingsClientConfig,
}

impl InferenceClient {
    pub fn new(config: EmbeddingsClientConfig) -> Result<Self, ReqwestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub async fn get_embedding(&self, text: &str) -> Result<EmbeddingsResponse, EmbeddingsError> {
        self.send_request(TextInput::Single(text.to_string())).await
    }

    pub async fn get_embeddings(
        &self,
        texts: &[String],
    ) -> Result<EmbeddingsResponse, EmbeddingsError> {
        self.send_request(TextInput::Multiple(texts.to_vec())).await
    }

    async fn send_request(&self, text: TextInput) -> Result<EmbeddingsResponse, EmbeddingsError> {
        let request = EmbeddingsRequest {
            text,
            model: &self.config.model,
        };

        let response = self
            .client
            .post(&self.config.service_url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| EmbeddingsError::RequestError(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingsError::StatusError(status.as_u16(), body));
        }

        response
            .json::<EmbeddingsResponse>()
            .await
            .map_err(|e| EmbeddingsError::ParseError(e.to_string()))
    }
}

// Adapter to implement the EmbeddingProvider trait
pub struct InferenceEmbeddingProvider {
    client: InferenceClient,
}

impl InferenceEmbeddingProvider {
    pub fn from_config(config: &EmbeddingsConfig) -> Result<Self, ReqwestError> {
        let client = InferenceClient::new(EmbeddingsClientConfig::from(config))?;
        Ok(Self { client })
    }
}

fn expect_count(
    response: EmbeddingsResponse,
    expected: usize,
) -> Result<Vec<Vec<f32>>, EmbeddingProviderError> {
    if response.embeddings.len() != expected {
        return Err(EmbeddingProviderError::ApiError(format!(
            "Expected {} embeddings, got {}",
            expected,
            response.embeddings.len()
        )));
    }
    Ok(response.embeddings)
}

#[async_trait]
impl EmbeddingProvider for InferenceEmbeddingProvider {
    async fn embed_documents(
        &self,
        texts: &[String],
    ) -> Result<Vec<Vec<f32>>, EmbeddingProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let response = self.client.get_embeddings(texts).await?;
        expect_count(response, texts.len())
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingProviderError> {
        if text.trim().is_empty() {
            return Err(EmbeddingProviderError::InvalidInput(
                "Query text cannot be empty".to_string(),
            ));
        }

        let response = self.client.get_embedding(text).await?;
        expect_count(response, 1)?
            .pop()
            .ok_or_else(|| EmbeddingProviderError::ApiError("No embeddings returned".to_string()))
    }

    fn model_name(&self) -> &str {
        self.client.model()
    }
}
