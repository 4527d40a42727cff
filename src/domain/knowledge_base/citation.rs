//! Citation formatting strategies

use crate::domain::ingestion::ChunkMetadata;

use super::index::ScoredChunk;

/// How retrieved chunks of a source type are cited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CitationStyle {
    /// Page number and line range, when the chunk carries them
    Paginated,
    /// No citation
    Unpaginated,
}

impl CitationStyle {
    /// Human-readable citation for one chunk, if the style and metadata allow one
    pub fn cite(&self, metadata: &ChunkMetadata) -> Option<String> {
        match self {
            Self::Unpaginated => None,
            Self::Paginated => {
                let page = metadata.provenance.page_number?;
                Some(match metadata.provenance.lines {
                    Some(lines) => format!(
                        "Page number: {}, From Line {} to {}",
                        page, lines.from, lines.to
                    ),
                    None => format!("Page number: {}", page),
                })
            }
        }
    }

    /// Citations of `hits` in rank order, one per line
    pub fn format_sources(&self, hits: &[ScoredChunk]) -> String {
        hits.iter()
            .filter_map(|hit| self.cite(&hit.chunk.metadata))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
