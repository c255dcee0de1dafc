//! In-memory doubles shared by unit tests.

use async_trait::async_trait;
use chrono::Utc;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use std::collections::VecDeque;
use std::collections::hash_map::DefaultHasher;
use std::fs::File;
use std::hash::{Hash, Hasher};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::application::ports::{
    ChatMessage, ChatModel, ChatModelError, ChatModelFactory, DocumentLoadError, DocumentLoader,
    EmbeddedChunk, EmbeddingProvider, EmbeddingProviderError, MetadataFilter, ScoredChunk,
    VectorStore, VectorStoreError,
};
use crate::domain::entities::{ChatLogEntry, DocumentRecord, SourceDocument};
use crate::domain::repositories::{
    ChatLogRepository, ChatLogRepositoryError, DocumentRepository, DocumentRepositoryError,
};
use crate::domain::value_objects::{ChunkMetadata, DocumentFormat, ModelName};

#[derive(Default)]
pub struct InMemoryDocumentRepository {
    records: Mutex<Vec<DocumentRecord>>,
    next_id: AtomicUsize,
    fail_deletes: AtomicBool,
}

impl InMemoryDocumentRepository {
    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn insert(&self, filename: &str) -> Result<i32, DocumentRepositoryError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i32 + 1;
        self.records
            .lock()
            .unwrap()
            .push(DocumentRecord::new(id, filename.to_string(), Utc::now()));
        Ok(id)
    }

    async fn find_all(&self) -> Result<Vec<DocumentRecord>, DocumentRepositoryError> {
        let mut records = self.records.lock().unwrap().clone();
        records.sort_by(|a, b| {
            b.upload_timestamp()
                .cmp(&a.upload_timestamp())
                .then(b.id().cmp(&a.id()))
        });
        Ok(records)
    }

    async fn delete(&self, id: i32) -> Result<bool, DocumentRepositoryError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(DocumentRepositoryError::DatabaseError(
                "connection refused".to_string(),
            ));
        }
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|record| record.id() != id);
        Ok(records.len() != before)
    }
}

#[derive(Default)]
pub struct InMemoryChatLogRepository {
    entries: Mutex<Vec<ChatLogEntry>>,
}

impl InMemoryChatLogRepository {
    pub fn entries(&self) -> Vec<ChatLogEntry> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatLogRepository for InMemoryChatLogRepository {
    async fn insert(&self, entry: &ChatLogEntry) -> Result<(), ChatLogRepositoryError> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn history(&self, session_id: &str) -> Result<Vec<ChatLogEntry>, ChatLogRepositoryError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|entry| entry.session_id() == session_id)
            .cloned()
            .collect())
    }
}

/// Bag-of-words vectors: texts sharing words score as similar.
pub struct HashEmbeddingProvider {
    dimension: usize,
}

impl Default for HashEmbeddingProvider {
    fn default() -> Self {
        Self { dimension: 256 }
    }
}

impl HashEmbeddingProvider {
    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; self.dimension];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            word.to_lowercase().hash(&mut hasher);
            vector[(hasher.finish() % self.dimension as u64) as usize] += 1.0;
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbeddingProvider {
    async fn embed_documents(
        &self,
        texts: &[String],
    ) -> Result<Vec<Vec<f32>>, EmbeddingProviderError> {
        Ok(texts.iter().map(|text| self.embed(text)).collect())
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingProviderError> {
        Ok(self.embed(text))
    }

    fn model_name(&self) -> &str {
        "hash-bow"
    }
}

/// Replies in order, repeating the last one; records every prompt it sees.
pub struct ScriptedChatModel {
    replies: Mutex<VecDeque<String>>,
    fail: bool,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedChatModel {
    pub fn with_replies(replies: Vec<&str>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(str::to_string).collect()),
            fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn answering(reply: &str) -> Self {
        Self::with_replies(vec![reply])
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::with_replies(Vec::new())
        }
    }

    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedChatModel {
    async fn generate(&self, messages: &[ChatMessage]) -> Result<String, ChatModelError> {
        self.calls.lock().unwrap().push(messages.to_vec());
        if self.fail {
            return Err(ChatModelError::ApiError("quota exceeded".to_string()));
        }

        let mut replies = self.replies.lock().unwrap();
        let reply = if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().cloned()
        };
        reply.ok_or(ChatModelError::EmptyResponse)
    }

    fn model_name(&self) -> ModelName {
        ModelName::default()
    }
}

pub struct StaticChatModelFactory {
    model: Option<Arc<ScriptedChatModel>>,
    created: AtomicUsize,
}

impl StaticChatModelFactory {
    pub fn new(model: Arc<ScriptedChatModel>) -> Self {
        Self {
            model: Some(model),
            created: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            model: None,
            created: AtomicUsize::new(0),
        }
    }

    /// Number of `create` calls, successful or not.
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl ChatModelFactory for StaticChatModelFactory {
    fn create(&self, _model: ModelName) -> Result<Arc<dyn ChatModel>, ChatModelError> {
        self.created.fetch_add(1, Ordering::SeqCst);
        match &self.model {
            Some(model) => Ok(model.clone()),
            None => Err(ChatModelError::Configuration(
                "GOOGLE_API_KEY is not set".to_string(),
            )),
        }
    }
}

/// Ignores the file contents and yields fixed text.
pub struct StaticDocumentLoader {
    text: Option<String>,
}

impl StaticDocumentLoader {
    pub fn with_text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self { text: None }
    }
}

#[async_trait]
impl DocumentLoader for StaticDocumentLoader {
    async fn load(&self, file_path: &Path) -> Result<Vec<SourceDocument>, DocumentLoadError> {
        let text = self
            .text
            .clone()
            .ok_or_else(|| DocumentLoadError::CorruptedFile("unreadable".to_string()))?;
        let mut metadata = ChunkMetadata::new();
        metadata.set_source(file_path.display().to_string());
        Ok(vec![SourceDocument::new(text, metadata)])
    }

    fn can_load(&self, _format: DocumentFormat) -> bool {
        true
    }
}

/// Delegates to a real store, with switchable failures.
pub struct FlakyVectorStore {
    inner: Arc<dyn VectorStore>,
    fail_persist: AtomicBool,
    fail_delete_where: AtomicBool,
    fail_delete_ids: AtomicBool,
}

impl FlakyVectorStore {
    pub fn new(inner: Arc<dyn VectorStore>) -> Self {
        Self {
            inner,
            fail_persist: AtomicBool::new(false),
            fail_delete_where: AtomicBool::new(false),
            fail_delete_ids: AtomicBool::new(false),
        }
    }

    pub fn fail_persist(&self) {
        self.fail_persist.store(true, Ordering::SeqCst);
    }

    pub fn fail_delete_where(&self) {
        self.fail_delete_where.store(true, Ordering::SeqCst);
    }

    pub fn fail_delete_ids(&self) {
        self.fail_delete_ids.store(true, Ordering::SeqCst);
    }
}

fn injected(operation: &str) -> VectorStoreError {
    VectorStoreError::StorageError(format!("injected {} failure", operation))
}

#[async_trait]
impl VectorStore for FlakyVectorStore {
    async fn add(&self, entries: Vec<EmbeddedChunk>) -> Result<Vec<String>, VectorStoreError> {
        self.inner.add(entries).await
    }

    async fn similarity_search(
        &self,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredChunk>, VectorStoreError> {
        self.inner.similarity_search(query, k).await
    }

    async fn delete_where(&self, filter: &MetadataFilter) -> Result<usize, VectorStoreError> {
        if self.fail_delete_where.load(Ordering::SeqCst) {
            return Err(injected("delete_where"));
        }
        self.inner.delete_where(filter).await
    }

    async fn ids_where(&self, filter: &MetadataFilter) -> Result<Vec<String>, VectorStoreError> {
        self.inner.ids_where(filter).await
    }

    async fn delete_ids(&self, ids: &[String]) -> Result<usize, VectorStoreError> {
        if self.fail_delete_ids.load(Ordering::SeqCst) {
            return Err(injected("delete_ids"));
        }
        self.inner.delete_ids(ids).await
    }

    async fn persist(&self) -> Result<(), VectorStoreError> {
        if self.fail_persist.load(Ordering::SeqCst) {
            return Err(injected("persist"));
        }
        self.inner.persist().await
    }

    async fn count(&self) -> Result<usize, VectorStoreError> {
        self.inner.count().await
    }
}

/// One Courier text line per page.
pub fn write_pdf(path: &Path, page_texts: &[&str]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in page_texts {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

/// Minimal Word archive; `None` leaves out `word/document.xml`.
pub fn write_docx(path: &Path, document_xml: Option<&str>) {
    let options = zip::write::SimpleFileOptions::default();
    let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
    writer.start_file("[Content_Types].xml", options).unwrap();
    writer.write_all(b"<Types/>").unwrap();
    if let Some(xml) = document_xml {
        writer.start_file("word/document.xml", options).unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
}
