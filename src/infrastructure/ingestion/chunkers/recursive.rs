//! Recursive chunking strategy

use unicode_segmentation::UnicodeSegmentation;

use crate::domain::ingestion::{
    Chunk, ChunkMetadata, ChunkingConfig, ChunkingStrategy, Document, LineRange,
};
use crate::domain::DomainError;

/// Boundary preference, strongest first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    Paragraph,
    Sentence,
    Word,
}

const BOUNDARIES: [Boundary; 3] = [Boundary::Paragraph, Boundary::Sentence, Boundary::Word];

/// Chunking strategy that cuts each window at the strongest boundary available
///
/// Splitting order: paragraphs -> sentences -> words -> characters. All sizes and
/// offsets are in characters. Every chunk is at most `chunk_size` long and each chunk
/// after the first starts exactly `chunk_overlap` characters before the previous one
/// ended.
#[derive(Debug, Clone, Default)]
pub struct RecursiveChunker;

/// Character view of one document with precomputed boundary tables
struct Text {
    chars: Vec<char>,
    /// Char positions where a sentence starts, ascending
    sentence_starts: Vec<usize>,
    /// `newlines[i]` = number of '\n' in `chars[..i]`
    newlines: Vec<usize>,
}

impl Text {
    fn new(content: &str) -> Self {
        let chars: Vec<char> = content.chars().collect();

        let sentence_bytes: Vec<usize> = content
            .split_sentence_bound_indices()
            .map(|(byte, _)| byte)
            .filter(|&byte| byte > 0)
            .collect();

        let mut sentence_starts = Vec::with_capacity(sentence_bytes.len());
        let mut wanted = sentence_bytes.iter().peekable();
        for (char_pos, (byte, _)) in content.char_indices().enumerate() {
            if wanted.peek() == Some(&&byte) {
                sentence_starts.push(char_pos);
                wanted.next();
            }
        }

        let mut newlines = Vec::with_capacity(chars.len() + 1);
        newlines.push(0);
        for c in &chars {
            let last = newlines.last().copied().unwrap_or(0);
            newlines.push(last + usize::from(*c == '\n'));
        }

        Self {
            chars,
            sentence_starts,
            newlines,
        }
    }

    fn len(&self) -> usize {
        self.chars.len()
    }

    fn is_boundary(&self, pos: usize, boundary: Boundary) -> bool {
        match boundary {
            Boundary::Paragraph => {
                pos >= 2 && self.chars[pos - 1] == '\n' && self.chars[pos - 2] == '\n'
            }
            Boundary::Sentence => self.sentence_starts.binary_search(&pos).is_ok(),
            Boundary::Word => pos >= 1 && self.chars[pos - 1].is_whitespace(),
        }
    }

    /// Largest cut position in `(lo, hi]` at the strongest available boundary,
    /// falling back to a hard cut at `hi`
    fn find_cut(&self, lo: usize, hi: usize) -> usize {
        BOUNDARIES
            .iter()
            .find_map(|&boundary| {
                (lo + 1..=hi)
                    .rev()
                    .find(|&pos| self.is_boundary(pos, boundary))
            })
            .unwrap_or(hi)
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.chars[start..end].iter().collect()
    }

    /// Line range of `[start, end)` given the document's range
    ///
    /// `from` counts newlines from the front of the document and `to` counts the ones
    /// after the span from the back, so a span covering the whole text keeps the
    /// document's range even when the text holds fewer newlines than the range.
    /// Trailing newlines of the document do not start a line.
    fn narrow_lines(&self, lines: LineRange, start: usize, end: usize) -> LineRange {
        let content_end = self
            .chars
            .iter()
            .rposition(|c| *c != '\n')
            .map_or(0, |pos| pos + 1);
        let total = self.newlines[content_end];

        let start = start.min(content_end);
        let last = end.min(content_end).saturating_sub(1).max(start);

        let from = (lines.from + self.newlines[start]).min(lines.to);
        let to = lines
            .to
            .saturating_sub(total - self.newlines[last])
            .max(lines.from)
            .min(lines.to);

        LineRange::new(from, to.max(from))
    }
}

impl RecursiveChunker {
    /// Create a new recursive chunker
    pub fn new() -> Self {
        Self
    }

    /// Character spans `[start, end)` covering `text`
    fn spans(text: &Text, config: &ChunkingConfig) -> Vec<(usize, usize)> {
        let n = text.len();
        let mut spans = Vec::new();
        let mut start = 0;

        while start < n {
            if n - start <= config.chunk_size {
                spans.push((start, n));
                break;
            }

            let end = text.find_cut(start + config.chunk_overlap, start + config.chunk_size);
            spans.push((start, end));
            start = end - config.chunk_overlap;
        }

        spans
    }
}

impl ChunkingStrategy for RecursiveChunker {
    fn chunk(&self, document: &Document, config: &ChunkingConfig) -> Result<Vec<Chunk>, DomainError> {
        config.validate()?;

        if document.is_blank() {
            return Ok(vec![]);
        }

        let text = Text::new(&document.content);

        let chunks = Self::spans(&text, config)
            .into_iter()
            .map(|(start, end)| (start, end, text.slice(start, end)))
            .filter(|(_, _, content)| !content.trim().is_empty())
            .enumerate()
            .map(|(idx, (start, end, content))| {
                let mut provenance = document.metadata.clone();
                provenance.lines = provenance
                    .lines
                    .map(|lines| text.narrow_lines(lines, start, end));

                Chunk::new(content, ChunkMetadata::new(idx, start, end, provenance))
            })
            .collect();

        Ok(chunks)
    }

    fn name(&self) -> &'static str {
        "recursive"
    }
}
