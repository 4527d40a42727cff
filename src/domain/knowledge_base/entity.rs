//! Knowledge base identity and source type

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::citation::CitationStyle;
use crate::domain::DomainError;

/// Identity key of a knowledge base: the base name of the ingested file
///
/// Compared byte-for-byte; no case, extension or whitespace normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KnowledgeBaseName(String);

impl KnowledgeBaseName {
    /// Create a name after validation
    ///
    /// Rejects empty names, path separators, `.`/`..` and dot-prefixed names, which
    /// are reserved for the store's own bookkeeping.
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();

        if name.is_empty() {
            return Err(DomainError::validation("Knowledge base name cannot be empty"));
        }

        if name.contains('/') || name.contains('\\') {
            return Err(DomainError::validation(format!(
                "Knowledge base name '{}' cannot contain path separators",
                name
            )));
        }

        if name.starts_with('.') {
            return Err(DomainError::validation(format!(
                "Knowledge base name '{}' cannot start with '.'",
                name
            )));
        }

        Ok(Self(name))
    }

    /// Derive the identity key from a file path
    pub fn from_path(path: &Path) -> Result<Self, DomainError> {
        let file_name = path.file_name().ok_or_else(|| {
            DomainError::validation(format!("'{}' does not name a file", path.display()))
        })?;

        let file_name = file_name.to_str().ok_or_else(|| {
            DomainError::validation(format!(
                "File name of '{}' is not valid UTF-8",
                path.display()
            ))
        })?;

        Self::new(file_name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for KnowledgeBaseName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<KnowledgeBaseName> for String {
    fn from(name: KnowledgeBaseName) -> Self {
        name.0
    }
}

impl fmt::Display for KnowledgeBaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Supported source document types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Pdf,
    Docx,
    Pptx,
    Txt,
}

impl SourceType {
    pub const ALL: [SourceType; 4] = [Self::Pdf, Self::Pptx, Self::Docx, Self::Txt];

    /// Extensions offered by the file picker
    pub fn supported_extensions() -> [&'static str; 4] {
        Self::ALL.map(|t| t.extension())
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Pptx => "pptx",
            Self::Txt => "txt",
        }
    }

    /// Detect the source type from a file extension, ignoring case
    pub fn from_path(path: &Path) -> Result<Self, DomainError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "Unsupported file type: '{}' has no extension",
                    path.display()
                ))
            })?;

        extension.parse().map_err(|_| {
            DomainError::validation(format!(
                "Unsupported file type '.{}' (expected one of: {})",
                extension,
                Self::supported_extensions().join(", ")
            ))
        })
    }

    /// Citation strategy for chunks of this type
    pub fn citation_style(&self) -> CitationStyle {
        match self {
            Self::Pdf => CitationStyle::Paginated,
            Self::Docx | Self::Pptx | Self::Txt => CitationStyle::Unpaginated,
        }
    }
}

impl FromStr for SourceType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "pptx" => Ok(Self::Pptx),
            "txt" => Ok(Self::Txt),
            other => Err(DomainError::validation(format!(
                "Unknown source type '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}
