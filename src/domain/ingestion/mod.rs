//! Document ingestion domain types and traits
//!
//! This module provides:
//! - `Document`, the page-tagged text unit produced by parsers
//! - `DocumentParser` trait for turning a file into documents
//! - `ChunkingStrategy` trait for splitting documents into chunks
//! - Configuration and result types for the ingestion pipeline

pub mod chunker;
pub mod document;
pub mod parser;
pub mod pipeline;

// Re-export main types
pub use chunker::{Chunk, ChunkMetadata, ChunkingConfig, ChunkingStrategy};
pub use document::{Document, DocumentMetadata, LineRange};
pub use parser::DocumentParser;
pub use pipeline::{
    BatchIngestionResult, FileSelection, IngestionConfig, IngestionFailure, IngestionOutcome,
    IngestionResult,
};

// Re-export mocks for testing
#[cfg(test)]
pub use parser::mock::MockDocumentParser;
