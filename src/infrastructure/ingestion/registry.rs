//! Registry mapping source types to document parsers

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::ingestion::DocumentParser;
use crate::domain::knowledge_base::SourceType;
use crate::domain::DomainError;

use super::parsers::PlainTextParser;

/// Parsers available to the ingestion pipeline, one per source type
///
/// Only plain text is built in. Hosts register parsers for pdf, docx and pptx.
#[derive(Debug, Clone, Default)]
pub struct ParserRegistry {
    parsers: HashMap<SourceType, Arc<dyn DocumentParser>>,
}

impl ParserRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in parsers
    pub fn with_defaults() -> Self {
        Self::new().with_parser(Arc::new(PlainTextParser::new()))
    }

    /// Register a parser, replacing any parser for the same source type
    pub fn with_parser(mut self, parser: Arc<dyn DocumentParser>) -> Self {
        self.register(parser);
        self
    }

    pub fn register(&mut self, parser: Arc<dyn DocumentParser>) {
        self.parsers.insert(parser.source_type(), parser);
    }

    /// Get the parser for a source type
    pub fn get(&self, source_type: SourceType) -> Result<Arc<dyn DocumentParser>, DomainError> {
        self.parsers.get(&source_type).cloned().ok_or_else(|| {
            DomainError::validation(format!(
                "No parser available for '{}' files",
                source_type
            ))
        })
    }

    /// Source types with a registered parser
    pub fn supported(&self) -> Vec<SourceType> {
        SourceType::ALL
            .into_iter()
            .filter(|t| self.parsers.contains_key(t))
            .collect()
    }
}
