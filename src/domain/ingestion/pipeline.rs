//! Ingestion pipeline types and configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::chunker::ChunkingConfig;
use crate::domain::knowledge_base::SourceType;
use crate::domain::DomainError;

/// Configuration for document ingestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionConfig {
    /// Chunking configuration
    #[serde(flatten)]
    pub chunking: ChunkingConfig,
    /// Number of chunks sent to the embedding provider per request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Number of files of one selection processed at the same time
    #[serde(default = "default_max_concurrent_files")]
    pub max_concurrent_files: usize,
}

fn default_batch_size() -> usize {
    32
}

fn default_max_concurrent_files() -> usize {
    2
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            chunking: ChunkingConfig::default(),
            batch_size: default_batch_size(),
            max_concurrent_files: default_max_concurrent_files(),
        }
    }
}

impl IngestionConfig {
    /// Create a new ingestion configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set chunk size
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunking.chunk_size = size;
        self
    }

    /// Set chunk overlap
    pub fn with_chunk_overlap(mut self, overlap: usize) -> Self {
        self.chunking.chunk_overlap = overlap;
        self
    }

    /// Set batch size
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set how many files are ingested at once
    pub fn with_max_concurrent_files(mut self, max: usize) -> Self {
        self.max_concurrent_files = max;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), DomainError> {
        self.chunking.validate()?;

        if self.batch_size == 0 {
            return Err(DomainError::configuration(
                "batch_size must be greater than 0",
            ));
        }

        if self.max_concurrent_files == 0 {
            return Err(DomainError::configuration(
                "max_concurrent_files must be greater than 0",
            ));
        }

        Ok(())
    }
}

/// Result of the file-selection dialog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileSelection {
    #[serde(default)]
    pub canceled: bool,
    #[serde(default, alias = "filePaths")]
    pub file_paths: Vec<PathBuf>,
}

impl FileSelection {
    /// A selection of the given paths
    pub fn paths(file_paths: Vec<PathBuf>) -> Self {
        Self {
            canceled: false,
            file_paths,
        }
    }

    /// A dismissed dialog
    pub fn canceled() -> Self {
        Self {
            canceled: true,
            file_paths: vec![],
        }
    }
}

/// Result of ingesting a single file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionResult {
    /// Identity key of the created knowledge base
    pub name: String,
    pub source_type: SourceType,
    /// Number of chunks embedded and persisted
    pub chunks_created: usize,
    /// Embedding dimensions of the persisted index
    pub dimensions: usize,
}

impl IngestionResult {
    pub fn new(
        name: impl Into<String>,
        source_type: SourceType,
        chunks_created: usize,
        dimensions: usize,
    ) -> Self {
        Self {
            name: name.into(),
            source_type,
            chunks_created,
            dimensions,
        }
    }
}

/// A file of a batch that was not ingested
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionFailure {
    pub path: String,
    /// Error kind label, see `DomainError::kind`
    pub kind: String,
    pub message: String,
}

impl IngestionFailure {
    pub fn new(path: impl Into<String>, error: &DomainError) -> Self {
        Self {
            path: path.into(),
            kind: error.kind().to_string(),
            message: error.to_string(),
        }
    }
}

/// Result of ingesting a batch of files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchIngestionResult {
    /// Files that became knowledge bases, in selection order
    pub succeeded: Vec<IngestionResult>,
    /// Files that were rejected or failed, in selection order
    pub failed: Vec<IngestionFailure>,
}

impl BatchIngestionResult {
    /// Create an empty batch result
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one file
    pub fn add(&mut self, path: impl Into<String>, result: Result<IngestionResult, DomainError>) {
        match result {
            Ok(result) => self.succeeded.push(result),
            Err(error) => self.failed.push(IngestionFailure::new(path, &error)),
        }
    }

    /// Total number of files processed
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// True when every file of the batch was ingested
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }

    /// Total chunks created across the batch
    pub fn total_chunks(&self) -> usize {
        self.succeeded.iter().map(|r| r.chunks_created).sum()
    }
}

/// Outcome of ingesting a file selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IngestionOutcome {
    /// The selection dialog was canceled; nothing was attempted
    Aborted,
    Completed(BatchIngestionResult),
}

impl IngestionOutcome {
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted)
    }
}
