use std::sync::{Arc, OnceLock};

use crate::application::ports::{ChatMessage, ChatModel, ChatModelError};
use crate::application::services::chat_model_cache::ChatModelCache;
use crate::application::services::vector_index::{Retriever, VectorIndex, VectorIndexError};
use crate::domain::entities::Chunk;
use crate::domain::value_objects::ModelName;

pub const CONTEXTUALIZE_SYSTEM_PROMPT: &str = "Given a chat history and the latest user question \
which might reference context in the chat history, formulate a standalone question which can be \
understood without the chat history. Do NOT answer the question, just reformulate it if needed \
and otherwise return it as is.";

pub const QA_SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant. Use the following context to answer the user's question.";

pub const DEFAULT_RETRIEVER_K: usize = 3;

#[derive(Debug)]
pub enum RagPipelineError {
    ModelInit(ChatModelError),
    Generation(ChatModelError),
    Retrieval(VectorIndexError),
}

impl std::fmt::Display for RagPipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RagPipelineError::ModelInit(e) => write!(f, "Failed to initialize chat model: {}", e),
            RagPipelineError::Generation(e) => write!(f, "Generation failed: {}", e),
            RagPipelineError::Retrieval(e) => write!(f, "Retrieval failed: {}", e),
        }
    }
}

impl std::error::Error for RagPipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RagPipelineError::ModelInit(e) | RagPipelineError::Generation(e) => Some(e),
            RagPipelineError::Retrieval(e) => Some(e),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RagOutput {
    pub input: String,
    pub answer: String,
    pub context: Vec<Chunk>,
}

/// Hands out a ready-to-run chain per request. Chat clients and the retriever
/// are built once and reused; the chain wrapping them is not.
pub struct RagPipelineBuilder {
    models: ChatModelCache,
    vector_index: Arc<VectorIndex>,
    k: usize,
    retriever: OnceLock<Retriever>,
}

impl RagPipelineBuilder {
    pub fn new(models: ChatModelCache, vector_index: Arc<VectorIndex>, k: usize) -> Self {
        Self {
            models,
            vector_index,
            k,
            retriever: OnceLock::new(),
        }
    }

    pub fn build(&self, model: ModelName) -> Result<RagChain, RagPipelineError> {
        let chat_model = self.models.get(model).map_err(RagPipelineError::ModelInit)?;
        let retriever = self
            .retriever
            .get_or_init(|| self.vector_index.as_retriever(self.k))
            .clone();

        Ok(RagChain {
            chat_model,
            retriever,
        })
    }
}

/// Reformulate, retrieve, answer.
pub struct RagChain {
    chat_model: Arc<dyn ChatModel>,
    retriever: Retriever,
}

impl RagChain {
    pub async fn invoke(
        &self,
        input: &str,
        chat_history: &[ChatMessage],
    ) -> Result<RagOutput, RagPipelineError> {
        let query = self.standalone_question(input, chat_history).await?;
        tracing::debug!("Retrieving top {} chunks for: {}", self.retriever.k(), query);

        let context = self
            .retriever
            .retrieve(&query)
            .await
            .map_err(RagPipelineError::Retrieval)?;

        let mut messages = vec![
            ChatMessage::system(QA_SYSTEM_PROMPT),
            ChatMessage::system(format!("Context: {}", format_context(&context))),
        ];
        messages.extend_from_slice(chat_history);
        messages.push(ChatMessage::human(input));

        tracing::debug!(
            "Answering with {} over {} context chunks",
            self.chat_model.model_name(),
            context.len()
        );
        let answer = self
            .chat_model
            .generate(&messages)
            .await
            .map_err(RagPipelineError::Generation)?;

        Ok(RagOutput {
            input: input.to_string(),
            answer,
            context,
        })
    }

    async fn standalone_question(
        &self,
        input: &str,
        chat_history: &[ChatMessage],
    ) -> Result<String, RagPipelineError> {
        if chat_history.is_empty() {
            return Ok(input.to_string());
        }

        let mut messages = Vec::with_capacity(chat_history.len() + 2);
        messages.push(ChatMessage::system(CONTEXTUALIZE_SYSTEM_PROMPT));
        messages.extend_from_slice(chat_history);
        messages.push(ChatMessage::human(input));

        self.chat_model
            .generate(&messages)
            .await
            .map_err(RagPipelineError::Generation)
    }
}

pub fn format_context(chunks: &[Chunk]) -> String {
    chunks
        .iter()
        .map(|chunk| chunk.text())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MessageRole;
    use crate::domain::value_objects::ChunkMetadata;
    use crate::infrastructure::vector_store::LocalVectorStore;
    use crate::testing::{HashEmbeddingProvider, ScriptedChatModel, StaticChatModelFactory};

    struct Fixture {
        _dir: tempfile::TempDir,
        model: Arc<ScriptedChatModel>,
        builder: RagPipelineBuilder,
    }

    async fn fixture(model: ScriptedChatModel, texts: &[&str]) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalVectorStore::open(dir.path()).unwrap();
        let index = Arc::new(VectorIndex::new(
            Arc::new(HashEmbeddingProvider::default()),
            Arc::new(store),
        ));
        let chunks = texts
            .iter()
            .map(|text| Chunk::new(text.to_string(), ChunkMetadata::new()))
            .collect();
        index.add_chunks(chunks).await.unwrap();

        let model = Arc::new(model);
        let cache = ChatModelCache::new(Arc::new(StaticChatModelFactory::new(model.clone())));

        Fixture {
            _dir: dir,
            model,
            builder: RagPipelineBuilder::new(cache, index, DEFAULT_RETRIEVER_K),
        }
    }

    #[tokio::test]
    async fn test_empty_history_skips_reformulation() {
        let fx = fixture(
            ScriptedChatModel::answering("Paris."),
            &["paris is the capital of france", "berlin is in germany"],
        )
        .await;

        let chain = fx.builder.build(ModelName::default()).unwrap();
        let output = chain.invoke("capital of france", &[]).await.unwrap();

        assert_eq!(output.answer, "Paris.");
        assert_eq!(output.input, "capital of france");
        assert_eq!(output.context.len(), 2);

        let calls = fx.model.calls();
        assert_eq!(calls.len(), 1);
        let prompt = &calls[0];
        assert_eq!(prompt[0], ChatMessage::system(QA_SYSTEM_PROMPT));
        assert!(prompt[1].content.starts_with("Context: paris is the capital of france"));
        assert_eq!(prompt.last(), Some(&ChatMessage::human("capital of france")));
    }

    #[tokio::test]
    async fn test_history_triggers_reformulation_before_answer() {
        let fx = fixture(
            ScriptedChatModel::with_replies(vec!["What is the capital of France?", "Paris."]),
            &["paris is the capital of france"],
        )
        .await;
        let history = vec![
            ChatMessage::human("Tell me about France"),
            ChatMessage::ai("France is a country in Europe."),
        ];

        let chain = fx.builder.build(ModelName::Gemini25Flash).unwrap();
        let output = chain.invoke("What is its capital?", &history).await.unwrap();

        assert_eq!(output.answer, "Paris.");

        let calls = fx.model.calls();
        assert_eq!(calls.len(), 2);

        let reformulate = &calls[0];
        assert_eq!(reformulate[0], ChatMessage::system(CONTEXTUALIZE_SYSTEM_PROMPT));
        assert_eq!(&reformulate[1..3], history.as_slice());
        assert_eq!(reformulate[3], ChatMessage::human("What is its capital?"));

        // The answer step sees the original question, not the rewritten one.
        let answer = &calls[1];
        assert_eq!(&answer[2..4], history.as_slice());
        assert_eq!(answer[4], ChatMessage::human("What is its capital?"));
        assert_eq!(answer[4].role, MessageRole::Human);
    }

    #[tokio::test]
    async fn test_retrieves_at_most_k_chunks() {
        let fx = fixture(
            ScriptedChatModel::answering("ok"),
            &["alpha", "beta", "gamma", "delta", "epsilon"],
        )
        .await;

        let chain = fx.builder.build(ModelName::default()).unwrap();
        let output = chain.invoke("alpha", &[]).await.unwrap();

        assert_eq!(output.context.len(), DEFAULT_RETRIEVER_K);
        assert_eq!(output.context[0].text(), "alpha");
    }

    #[tokio::test]
    async fn test_generation_failure_propagates() {
        let fx = fixture(ScriptedChatModel::failing(), &["alpha"]).await;

        let chain = fx.builder.build(ModelName::default()).unwrap();
        let result = chain.invoke("alpha", &[]).await;

        assert!(matches!(result, Err(RagPipelineError::Generation(_))));
    }

    #[test]
    fn test_format_context_joins_with_blank_line() {
        let chunks = vec![
            Chunk::new("one".to_string(), ChunkMetadata::new()),
            Chunk::new("two".to_string(), ChunkMetadata::new()),
        ];

        assert_eq!(format_context(&chunks), "one\n\ntwo");
        assert_eq!(format_context(&[]), "");
    }
}
