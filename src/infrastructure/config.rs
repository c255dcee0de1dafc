use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::application::services::rag_pipeline::DEFAULT_RETRIEVER_K;
use crate::application::services::text_splitter::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};

#[derive(Debug)]
pub enum ConfigError {
    Missing(String),
    Invalid { key: String, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} not set", key),
            ConfigError::Invalid { key, value } => {
                write!(f, "Invalid value for {}: {:?}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            value,
        }),
        Err(_) => Ok(default),
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub upload_dir: PathBuf,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: var_or("HOST", "0.0.0.0"),
            port: parse_or("PORT", 8000)?,
            max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", 250 * 1024 * 1024)?,
            upload_dir: PathBuf::from(var_or("UPLOAD_DIR", ".")),
        })
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: optional("DATABASE_URL").ok_or_else(|| ConfigError::Missing("DATABASE_URL".to_string()))?,
            max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 10)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorStoreBackend {
    Local,
    Postgres,
}

impl FromStr for VectorStoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(VectorStoreBackend::Local),
            "postgres" | "pgvector" => Ok(VectorStoreBackend::Postgres),
            other => Err(format!("Unknown vector store backend: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct VectorStoreConfig {
    pub backend: VectorStoreBackend,
    pub path: PathBuf,
}

impl VectorStoreConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            backend: parse_or("VECTOR_STORE_BACKEND", VectorStoreBackend::Local)?,
            path: PathBuf::from(var_or("VECTOR_DB_PATH", "./vector_db")),
        })
    }
}

#[derive(Debug, Clone)]
pub struct EmbeddingsConfig {
    pub service_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl EmbeddingsConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            service_url: var_or("EMBEDDINGS_SERVICE_URL", "http://localhost:8080/embed"),
            model: var_or("EMBEDDING_MODEL", "all-MiniLM-L6-v2"),
            timeout_secs: parse_or("EMBEDDINGS_TIMEOUT_SECS", 30)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Checked lazily when a chat model is first built.
    pub api_key: Option<String>,
    pub api_base: String,
    pub timeout_secs: u64,
}

impl LlmConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: optional("GOOGLE_API_KEY"),
            api_base: var_or(
                "GEMINI_API_BASE",
                "https://generativelanguage.googleapis.com/v1beta",
            ),
            timeout_secs: parse_or("LLM_TIMEOUT_SECS", 120)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter: String,
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self {
            filter: var_or("RUST_LOG", "info"),
            file: optional("LOG_FILE").map(PathBuf::from),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    pub k: usize,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl RetrievalConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            k: parse_or("RETRIEVER_K", DEFAULT_RETRIEVER_K)?,
            chunk_size: parse_or("CHUNK_SIZE", DEFAULT_CHUNK_SIZE)?,
            chunk_overlap: parse_or("CHUNK_OVERLAP", DEFAULT_CHUNK_OVERLAP)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub vector_store: VectorStoreConfig,
    pub embeddings: EmbeddingsConfig,
    pub llm: LlmConfig,
    pub logging: LoggingConfig,
    pub retrieval: RetrievalConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            vector_store: VectorStoreConfig::from_env()?,
            embeddings: EmbeddingsConfig::from_env()?,
            llm: LlmConfig::from_env()?,
            logging: LoggingConfig::from_env(),
            retrieval: RetrievalConfig::from_env()?,
        })
    }
}
