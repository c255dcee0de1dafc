use std::sync::Arc;

use crate::{
    application::{
        ports::{ChatModelFactory, DocumentLoader, EmbeddingProvider, FileStorage, VectorStore},
        services::{
            ChatModelCache, IndexingService, RagPipelineBuilder, RecursiveCharacterSplitter,
            VectorIndex,
        },
        use_cases::{ChatUseCase, DeleteDocumentUseCase, ListDocumentsUseCase, UploadDocumentUseCase},
    },
    domain::repositories::{ChatLogRepository, DocumentRepository},
    infrastructure::{
        config::{AppConfig, VectorStoreBackend},
        database::{
            DbPool, create_connection_pool, get_database_connection,
            repositories::{PostgresChatLogRepository, PostgresDocumentRepository},
            run_migrations,
        },
        external_services::{
            CompositeDocumentLoader, GeminiChatModelFactory, InferenceEmbeddingProvider,
        },
        file_system::LocalFileStorage,
        vector_store::{LocalVectorStore, PgVectorStore},
    },
    presentation::http::handlers::{ChatHandler, DocumentHandler},
};

/// Everything is wired once here; only the HTTP handlers outlive start-up.
pub struct AppContainer {
    pub chat_handler: Arc<ChatHandler>,
    pub document_handler: Arc<DocumentHandler>,
}

fn open_vector_store(
    config: &AppConfig,
    pool: &DbPool,
) -> Result<Arc<dyn VectorStore>, Box<dyn std::error::Error>> {
    let store: Arc<dyn VectorStore> = match config.vector_store.backend {
        VectorStoreBackend::Local => Arc::new(LocalVectorStore::open(&config.vector_store.path)?),
        VectorStoreBackend::Postgres => Arc::new(PgVectorStore::new(pool.clone())),
    };
    tracing::info!("Vector store backend: {:?}", config.vector_store.backend);
    Ok(store)
}

impl AppContainer {
    pub async fn new(config: &AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        // Database and schema
        let db_pool = create_connection_pool(&config.database)?;
        let mut conn = get_database_connection(&config.database)
            .map_err(|e| format!("Failed to create database connection: {}", e))?;
        run_migrations(&mut conn).map_err(|e| format!("Failed to run database migrations: {}", e))?;

        let document_repository: Arc<dyn DocumentRepository> =
            Arc::new(PostgresDocumentRepository::new(db_pool.clone()));
        let chat_log_repository: Arc<dyn ChatLogRepository> =
            Arc::new(PostgresChatLogRepository::new(db_pool.clone()));

        // External services
        let embedding_provider: Arc<dyn EmbeddingProvider> =
            Arc::new(InferenceEmbeddingProvider::from_config(&config.embeddings)?);
        let vector_store = open_vector_store(config, &db_pool)?;
        let file_storage: Arc<dyn FileStorage> =
            Arc::new(LocalFileStorage::new(config.server.upload_dir.clone()));
        let document_loader: Arc<dyn DocumentLoader> = Arc::new(CompositeDocumentLoader::new());
        let chat_model_factory: Arc<dyn ChatModelFactory> =
            Arc::new(GeminiChatModelFactory::from_config(&config.llm)?);

        // Application services
        let splitter = RecursiveCharacterSplitter::new(
            config.retrieval.chunk_size,
            config.retrieval.chunk_overlap,
        )
        .map_err(|e| format!("Invalid splitter configuration: {}", e))?;
        tracing::info!(
            "Splitting documents into {}-char chunks with {} overlap",
            splitter.chunk_size(),
            splitter.chunk_overlap()
        );

        let vector_index = Arc::new(VectorIndex::new(embedding_provider, vector_store));
        match vector_index.count().await {
            Ok(total) => tracing::info!("Vector index holds {} chunks", total),
            Err(e) => tracing::warn!("Could not count indexed chunks: {}", e),
        }
        let indexing_service = Arc::new(IndexingService::new(
            document_loader,
            splitter,
            vector_index.clone(),
        ));
        let rag_pipeline = Arc::new(RagPipelineBuilder::new(
            ChatModelCache::new(chat_model_factory),
            vector_index,
            config.retrieval.k,
        ));

        // Use cases
        let chat_use_case = Arc::new(ChatUseCase::new(chat_log_repository, rag_pipeline));
        let upload_use_case = Arc::new(UploadDocumentUseCase::new(
            document_repository.clone(),
            file_storage,
            indexing_service.clone(),
        ));
        let list_documents_use_case =
            Arc::new(ListDocumentsUseCase::new(document_repository.clone()));
        let delete_document_use_case = Arc::new(DeleteDocumentUseCase::new(
            document_repository,
            indexing_service,
        ));

        // HTTP handlers
        let chat_handler = Arc::new(ChatHandler::new(chat_use_case));
        let document_handler = Arc::new(DocumentHandler::new(
            upload_use_case,
            list_documents_use_case,
            delete_document_use_case,
        ));

        Ok(Self {
            chat_handler,
            document_handler,
        })
    }
}
