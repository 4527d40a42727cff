//! In-memory vector index of one knowledge base

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::SourceType;
use crate::domain::embedding::cosine_similarity;
use crate::domain::ingestion::Chunk;
use crate::domain::DomainError;

/// Version of the persisted index layout
pub const INDEX_FORMAT_VERSION: u32 = 1;

/// Descriptive header of a persisted index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexManifest {
    pub format_version: u32,
    /// Embedding model the vectors were produced with
    pub model: String,
    pub dimensions: usize,
    pub created_at: DateTime<Utc>,
    pub source_type: SourceType,
}

/// A chunk returned by similarity search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    /// Cosine similarity to the query, higher is closer
    pub score: f32,
}

/// Chunks paired with their embedding vectors
#[derive(Debug, Clone, PartialEq)]
pub struct VectorIndex {
    manifest: IndexManifest,
    chunks: Vec<Chunk>,
    vectors: Vec<Vec<f32>>,
}

impl VectorIndex {
    /// Build a fresh index from chunks and their vectors
    pub fn build(
        model: impl Into<String>,
        source_type: SourceType,
        chunks: Vec<Chunk>,
        vectors: Vec<Vec<f32>>,
    ) -> Result<Self, DomainError> {
        let dimensions = vectors.first().map(Vec::len).unwrap_or(0);
        let manifest = IndexManifest {
            format_version: INDEX_FORMAT_VERSION,
            model: model.into(),
            dimensions,
            created_at: Utc::now(),
            source_type,
        };

        Self::from_parts(manifest, chunks, vectors)
    }

    /// Reassemble an index, checking that every part agrees with the manifest
    pub fn from_parts(
        manifest: IndexManifest,
        chunks: Vec<Chunk>,
        vectors: Vec<Vec<f32>>,
    ) -> Result<Self, DomainError> {
        if manifest.format_version != INDEX_FORMAT_VERSION {
            return Err(DomainError::corrupt_index(format!(
                "unsupported index format version {}",
                manifest.format_version
            )));
        }

        if chunks.is_empty() {
            return Err(DomainError::corrupt_index("index contains no chunks"));
        }

        if manifest.dimensions == 0 {
            return Err(DomainError::corrupt_index("index has zero dimensions"));
        }

        if chunks.len() != vectors.len() {
            return Err(DomainError::corrupt_index(format!(
                "{} chunks but {} vectors",
                chunks.len(),
                vectors.len()
            )));
        }

        if let Some(pos) = vectors.iter().position(|v| v.len() != manifest.dimensions) {
            return Err(DomainError::corrupt_index(format!(
                "vector {} has {} dimensions, expected {}",
                pos,
                vectors[pos].len(),
                manifest.dimensions
            )));
        }

        Ok(Self {
            manifest,
            chunks,
            vectors,
        })
    }

    pub fn manifest(&self) -> &IndexManifest {
        &self.manifest
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Exact cosine search returning at most `top_k` chunks, best first.
    /// Equal scores keep insertion order.
    pub fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>, DomainError> {
        if query.len() != self.manifest.dimensions {
            return Err(DomainError::corrupt_index(format!(
                "query has {} dimensions but the index was built with {}",
                query.len(),
                self.manifest.dimensions
            )));
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(idx, vector)| (idx, cosine_similarity(query, vector)))
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        Ok(scored
            .into_iter()
            .take(top_k)
            .map(|(idx, score)| ScoredChunk {
                chunk: self.chunks[idx].clone(),
                score,
            })
            .collect())
    }
}
