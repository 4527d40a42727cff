use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::ingestion::{ChunkingConfig, IngestionConfig};
use crate::domain::DomainError;
use crate::infrastructure::embedding::{DEFAULT_OLLAMA_BASE_URL, DEFAULT_OLLAMA_MODEL};
use crate::infrastructure::knowledge_base::RetrievalConfig;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub embedding: EmbeddingSettings,
    pub chunking: ChunkingConfig,
    pub ingestion: IngestionSettings,
    pub retrieval: RetrievalConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Where knowledge bases live on disk
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub documents_root: PathBuf,
    /// Staging directories older than this are leftovers of a crashed commit
    pub staging_ttl_secs: u64,
}

/// Embedding service connection
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub base_url: String,
    /// Used for both ingestion and queries
    pub model: String,
    pub timeout_secs: u64,
    pub batch_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestionSettings {
    pub max_concurrent_files: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3030,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            documents_root: PathBuf::from("./knowledge_bases"),
            staging_ttl_secs: 3600,
        }
    }
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
            model: DEFAULT_OLLAMA_MODEL.to_string(),
            timeout_secs: 60,
            batch_size: 32,
        }
    }
}

impl Default for IngestionSettings {
    fn default() -> Self {
        Self {
            max_concurrent_files: 2,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with(None)
    }

    /// Load layered configuration, optionally adding an explicit file on top of the
    /// default and local files. Environment variables always win.
    pub fn load_with(file: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false));

        if let Some(file) = file {
            builder = builder.add_source(config::File::with_name(file).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("DOCCHAT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        self.ingestion_config().validate()?;

        if self.embedding.model.trim().is_empty() {
            return Err(DomainError::configuration("embedding.model cannot be empty"));
        }

        if self.embedding.timeout_secs == 0 {
            return Err(DomainError::configuration(
                "embedding.timeout_secs must be greater than 0",
            ));
        }

        if self.retrieval.top_k == 0 {
            return Err(DomainError::configuration(
                "retrieval.top_k must be greater than 0",
            ));
        }

        Ok(())
    }

    pub fn ingestion_config(&self) -> IngestionConfig {
        IngestionConfig::new()
            .with_chunk_size(self.chunking.chunk_size)
            .with_chunk_overlap(self.chunking.chunk_overlap)
            .with_batch_size(self.embedding.batch_size)
            .with_max_concurrent_files(self.ingestion.max_concurrent_files)
    }
}
