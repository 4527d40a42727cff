//! Domain layer - Core business logic and entities

pub mod embedding;
pub mod error;
pub mod ingestion;
pub mod knowledge_base;

pub use embedding::{embed_batched, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
pub use error::DomainError;
pub use ingestion::{
    BatchIngestionResult, Chunk, ChunkMetadata, ChunkingConfig, ChunkingStrategy, Document,
    DocumentMetadata, DocumentParser, FileSelection, IngestionConfig, IngestionOutcome,
    IngestionResult,
};
pub use knowledge_base::{
    CitationStyle, GroundedPrompt, KnowledgeBaseName, KnowledgeBaseStore, RetrievalResult,
    ScoredChunk, SourceType, VectorIndex,
};
