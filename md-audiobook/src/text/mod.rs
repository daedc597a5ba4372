//! Text processing for narration: markdown normalization and chunking.

pub mod chunker;
pub mod markdown;

pub use chunker::{ChunkError, DEFAULT_CHUNK_LIMIT, split_text};
pub use markdown::markdown_to_text;

/// A segment of narration text ready for speech synthesis.
#[derive(Debug, Clone, PartialEq)]
pub struct TextChunk {
    /// The chapter this chunk belongs to
    pub chapter_id: usize,
    /// The chunk index within the chapter
    pub chunk_id: usize,
    /// The text content
    pub text: String,
}

impl TextChunk {
    /// Create a new text chunk.
    pub fn new(chapter_id: usize, chunk_id: usize, text: String) -> Self {
        Self {
            chapter_id,
            chunk_id,
            text,
        }
    }

    /// Number of characters in the chunk.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Stable file stem for this chunk's audio, sortable in narration order.
    pub fn file_stem(&self) -> String {
        format!("ch{:04}_ck{:04}", self.chapter_id, self.chunk_id)
    }
}

/// Normalize a chapter's markdown and split it into numbered chunks.
///
/// Returns an empty list when the chapter has no narratable text.
pub fn process_chapter(
    chapter_id: usize,
    markdown: &str,
    limit: usize,
) -> Result<Vec<TextChunk>, ChunkError> {
    let text = markdown_to_text(markdown);
    let chunks = split_text(&text, limit)?
        .into_iter()
        .enumerate()
        .map(|(chunk_id, text)| TextChunk::new(chapter_id, chunk_id, text))
        .collect();
    Ok(chunks)
}
