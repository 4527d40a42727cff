//! Document ingestion infrastructure
//!
//! This module provides implementations for document parsing, chunking,
//! and the ingestion pipeline.

pub mod chunkers;
pub mod locks;
pub mod parsers;
pub mod pipeline;
pub mod registry;

// Re-export parsers
pub use parsers::PlainTextParser;

// Re-export chunkers
pub use chunkers::RecursiveChunker;

pub use locks::KeyedLocks;
pub use registry::ParserRegistry;

// Re-export pipeline
pub use pipeline::IngestionPipeline;
