//! Chunking strategy trait and types

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use super::document::{Document, DocumentMetadata};
use crate::domain::DomainError;

/// Configuration for chunking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum chunk size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,
}

impl ChunkingConfig {
    /// Create a new chunking configuration
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.chunk_size == 0 {
            return Err(DomainError::configuration(
                "chunk_size must be greater than 0",
            ));
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(DomainError::configuration(
                "chunk_overlap must be less than chunk_size",
            ));
        }

        Ok(())
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Metadata for a chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkMetadata {
    /// Index of this chunk within its file (0-based)
    pub chunk_index: usize,
    /// Character offset where this chunk starts in its source document
    pub char_start: usize,
    /// Character offset where this chunk ends (exclusive)
    pub char_end: usize,
    /// Provenance inherited from the source document, line range narrowed to the chunk
    #[serde(flatten)]
    pub provenance: DocumentMetadata,
}

impl ChunkMetadata {
    /// Create new chunk metadata
    pub fn new(
        chunk_index: usize,
        char_start: usize,
        char_end: usize,
        provenance: DocumentMetadata,
    ) -> Self {
        Self {
            chunk_index,
            char_start,
            char_end,
            provenance,
        }
    }
}

/// A chunk of text extracted from a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Chunk content
    pub content: String,
    /// Chunk metadata
    pub metadata: ChunkMetadata,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(content: impl Into<String>, metadata: ChunkMetadata) -> Self {
        Self {
            content: content.into(),
            metadata,
        }
    }

    /// Get the chunk index
    pub fn index(&self) -> usize {
        self.metadata.chunk_index
    }

    /// Get the content length in characters
    pub fn char_len(&self) -> usize {
        self.metadata.char_end - self.metadata.char_start
    }
}

/// Trait for chunking strategies
pub trait ChunkingStrategy: Send + Sync + Debug {
    /// Split one document into chunks, indexed from 0
    fn chunk(&self, document: &Document, config: &ChunkingConfig)
        -> Result<Vec<Chunk>, DomainError>;

    /// Get the strategy name
    fn name(&self) -> &'static str;

    /// Split every document of a file, keeping document order and numbering chunks
    /// consecutively across documents
    fn chunk_documents(
        &self,
        documents: &[Document],
        config: &ChunkingConfig,
    ) -> Result<Vec<Chunk>, DomainError> {
        let mut chunks = Vec::new();

        for document in documents {
            for mut chunk in self.chunk(document, config)? {
                chunk.metadata.chunk_index = chunks.len();
                chunks.push(chunk);
            }
        }

        Ok(chunks)
    }
}
