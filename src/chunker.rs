// Splits a document into line-bounded, size-bounded chunks for a bounded-context checker.
// Chunks carry their absolute 1-based starting line so checkers can report absolute positions.

use crate::document::Document;

/// Default chunk budget in estimated tokens
pub const DEFAULT_MAX_CHUNK_TOKENS: usize = 3000;

/// Approximate token count for a piece of text (about four characters per token)
pub fn estimate_tokens(text: &str) -> usize {
    estimate_tokens_for_chars(text.chars().count())
}

fn estimate_tokens_for_chars(chars: usize) -> usize {
    chars.div_ceil(4)
}

/// Contiguous run of whole lines from a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Absolute 1-based line number of the first line in this chunk
    pub start_line: usize,
    pub lines: &'a [String],
}

impl<'a> Chunk<'a> {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Absolute 1-based number of the last line in this chunk
    pub fn end_line(&self) -> usize {
        self.start_line + self.lines.len().saturating_sub(1)
    }

    pub fn estimated_tokens(&self) -> usize {
        estimate_tokens_for_chars(joined_chars(self.lines))
    }

    /// True when there is nothing for a checker to look at
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }

    /// Lines paired with their absolute line numbers
    pub fn numbered_lines(&self) -> impl Iterator<Item = (usize, &'a str)> + '_ {
        self.lines
            .iter()
            .enumerate()
            .map(move |(offset, line)| (self.start_line + offset, line.as_str()))
    }
}

fn joined_chars(lines: &[String]) -> usize {
    let content: usize = lines.iter().map(|line| line.chars().count()).sum();
    content + lines.len().saturating_sub(1)
}

/// Lazy iterator over the chunks of a document
#[derive(Debug, Clone)]
pub struct Chunker<'a> {
    lines: &'a [String],
    next_index: usize,
    max_tokens: usize,
}

impl<'a> Chunker<'a> {
    pub fn new(document: &'a Document, max_tokens: usize) -> Self {
        Self {
            lines: document.lines(),
            next_index: 0,
            max_tokens,
        }
    }
}

impl<'a> Iterator for Chunker<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_index >= self.lines.len() {
            return None;
        }

        let start = self.next_index;
        let mut end = start;
        let mut chars = 0usize;

        while end < self.lines.len() {
            let line_chars = self.lines[end].chars().count();
            let separator = usize::from(end > start);
            let candidate = chars + separator + line_chars;

            // An oversized line is still emitted, alone, rather than split.
            // A zero budget admits nothing past the first line.
            if end > start && (self.max_tokens == 0 || estimate_tokens_for_chars(candidate) > self.max_tokens) {
                break;
            }

            chars = candidate;
            end += 1;
        }

        self.next_index = end;
        Some(Chunk {
            start_line: start + 1,
            lines: &self.lines[start..end],
        })
    }
}

/// Convenience wrapper for callers that just want the chunk list
pub fn chunk_document(document: &Document, max_tokens: usize) -> Vec<Chunk<'_>> {
    Chunker::new(document, max_tokens).collect()
}
