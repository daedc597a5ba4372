//! Length-bounded text chunking for speech synthesis.
//!
//! Text is packed greedily into segments of at most `limit` characters,
//! splitting at the coarsest boundary that works: paragraphs first, then
//! sentences, then the last space inside the window, and finally a hard cut
//! at exactly `limit` characters when a run of text contains no space at all.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Default chunk limit in characters, kept under the API's 10k ceiling.
pub const DEFAULT_CHUNK_LIMIT: usize = 9500;

/// Separator between paragraphs inside one segment.
const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Separator between sentences (or forced pieces) inside one segment.
const SENTENCE_SEPARATOR: &str = " ";

/// A blank line: two newlines with only whitespace between them.
static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Sentence-ending punctuation followed by whitespace.
static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]\s+").unwrap());

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkError {
    #[error("Invalid chunk limit {0}: must be at least 1 character")]
    InvalidLimit(usize),
}

/// Split text into ordered segments of at most `limit` characters.
///
/// Text that already fits is returned unchanged as a single segment. Empty
/// text yields no segments. Lengths are measured in characters, not bytes.
///
/// A forced cut inside a word happens only when `limit` characters pass
/// without a space; that piece is exactly `limit` characters long.
pub fn split_text(text: &str, limit: usize) -> Result<Vec<String>, ChunkError> {
    if limit == 0 {
        return Err(ChunkError::InvalidLimit(limit));
    }

    if text.is_empty() {
        return Ok(Vec::new());
    }

    if char_len(text) <= limit {
        return Ok(vec![text.to_string()]);
    }

    let mut packer = Packer::new(limit);

    for paragraph in PARAGRAPH_BREAK.split(text) {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }

        if char_len(paragraph) <= limit {
            packer.push(paragraph, PARAGRAPH_SEPARATOR);
            continue;
        }

        // The first unit of a paragraph still sits on a paragraph boundary.
        let mut separator = PARAGRAPH_SEPARATOR;
        for sentence in split_sentences(paragraph) {
            if char_len(sentence) <= limit {
                packer.push(sentence, separator);
            } else {
                for piece in force_split(sentence, limit) {
                    packer.push(piece, separator);
                    separator = SENTENCE_SEPARATOR;
                }
            }
            separator = SENTENCE_SEPARATOR;
        }
    }

    Ok(packer.finish())
}

/// Greedy segment builder: appends units while they fit, flushes otherwise.
struct Packer {
    limit: usize,
    current: String,
    current_len: usize,
    segments: Vec<String>,
}

impl Packer {
    fn new(limit: usize) -> Self {
        Self {
            limit,
            current: String::new(),
            current_len: 0,
            segments: Vec::new(),
        }
    }

    fn push(&mut self, unit: &str, separator: &str) {
        let unit_len = char_len(unit);

        if self.current.is_empty() {
            self.current.push_str(unit);
            self.current_len = unit_len;
            return;
        }

        let separator_len = char_len(separator);
        if self.current_len + separator_len + unit_len <= self.limit {
            self.current.push_str(separator);
            self.current.push_str(unit);
            self.current_len += separator_len + unit_len;
        } else {
            self.flush();
            self.current.push_str(unit);
            self.current_len = unit_len;
        }
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.segments.push(std::mem::take(&mut self.current));
        }
        self.current_len = 0;
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        self.segments
    }
}

/// Split a paragraph at `. ! ?` followed by whitespace, keeping the
/// punctuation with its sentence.
fn split_sentences(paragraph: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for m in SENTENCE_END.find_iter(paragraph) {
        // Punctuation is a single byte, so this stays on a char boundary.
        let sentence = paragraph[start..m.start() + 1].trim();
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
        start = m.end();
    }

    let tail = paragraph[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }

    sentences
}

/// Cut an over-long sentence into pieces of at most `limit` characters.
///
/// Each cut lands on the last space at or before character offset `limit`.
/// Without such a space the cut is made at exactly `limit` characters, even
/// mid-word.
fn force_split(sentence: &str, limit: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut rest = sentence.trim();

    while char_len(rest) > limit {
        let mut last_space = None;
        let mut hard_cut = rest.len();

        // Look at characters 0..=limit: a space sitting exactly at the
        // offset still yields a piece of `limit` characters.
        for (offset, (byte, ch)) in rest.char_indices().take(limit + 1).enumerate() {
            if offset == limit {
                hard_cut = byte;
            }
            if ch == ' ' && offset > 0 {
                last_space = Some(byte);
            }
        }

        match last_space {
            Some(byte) => {
                pieces.push(rest[..byte].trim_end());
                rest = rest[byte..].trim_start();
            }
            None => {
                pieces.push(&rest[..hard_cut]);
                rest = rest[hard_cut..].trim_start();
            }
        }
    }

    if !rest.is_empty() {
        pieces.push(rest);
    }

    pieces
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
