//! Retrieval results and grounded prompt assembly

use serde::{Deserialize, Serialize};

use super::citation::CitationStyle;
use super::index::ScoredChunk;
use crate::domain::DomainError;

/// Prompt handed to the language model together with user-facing citations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundedPrompt {
    pub prompt: String,
    /// One citation per line, most relevant first; empty for unpaginated sources
    pub sources: String,
}

/// Ranked chunks retrieved for one query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub query: String,
    pub hits: Vec<ScoredChunk>,
}

impl RetrievalResult {
    pub fn new(query: impl Into<String>, hits: Vec<ScoredChunk>) -> Self {
        Self {
            query: query.into(),
            hits,
        }
    }

    /// Citations for the hits under the given style
    pub fn sources(&self, style: CitationStyle) -> String {
        style.format_sources(&self.hits)
    }

    /// Prompt embedding the query and the serialized hits as the only allowed context
    pub fn prompt(&self) -> Result<String, DomainError> {
        let context = serde_json::to_string(&self.hits).map_err(context_error)?;

        Ok(format!(
            "this is my question {},\n answer only from the following context: \n {}",
            self.query, context
        ))
    }

    pub fn into_grounded_prompt(self, style: CitationStyle) -> Result<GroundedPrompt, DomainError> {
        Ok(GroundedPrompt {
            prompt: self.prompt()?,
            sources: self.sources(style),
        })
    }
}

/// Hits come from a loaded index; failing to serialize them is an index fault
fn context_error(e: serde_json::Error) -> DomainError {
    DomainError::corrupt_index(format!("Failed to serialize retrieval context: {}", e))
}
