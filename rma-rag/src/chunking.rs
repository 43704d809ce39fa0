//! Document chunking.
//!
//! This module provides the [`Chunker`] trait and [`RecursiveChunker`],
//! which splits text on the most structural separator available (blank
//! line, then newline, then space) and falls back to a hard character cut
//! only for runs with no separators at all. Adjacent chunks share exactly
//! `chunk_overlap` characters of context carried from the end of the
//! previous chunk, so meaning is not lost at a cut boundary.
//!
//! All sizes are measured in characters (Unicode scalar values), never
//! bytes, so multibyte text can never be cut mid-character.

use uuid::Uuid;

use crate::document::{Chunk, Document};
use crate::error::{RagError, Result};
use crate::RagConfig;

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s with text and metadata but no
/// embeddings. Embeddings are attached later by the ingestion pipeline.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// Returns an empty `Vec` if the document has no text. Each returned
    /// chunk has an empty embedding vector and a fresh opaque identifier.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Separator hierarchy, most structural first. A segment that still
/// exceeds the piece budget after the last separator is cut at character
/// boundaries.
const SEPARATORS: [&str; 3] = ["\n\n", "\n", " "];

/// Splits text hierarchically: paragraphs, then lines, then words, with a
/// hard character cut as the last resort.
///
/// Pieces produced by the recursive split are merged greedily up to
/// `chunk_size`, and every chunk after the first is seeded with the final
/// `chunk_overlap` characters of its predecessor. Three properties hold
/// for any valid configuration:
///
/// - every chunk is at most `chunk_size` characters long;
/// - adjacent chunks share exactly `chunk_overlap` characters;
/// - stripping each chunk's seed and concatenating the rest reconstructs
///   the input text exactly.
///
/// # Example
///
/// ```rust,ignore
/// use rma_rag::RecursiveChunker;
///
/// let chunker = RecursiveChunker::new(1000, 200)?;
/// let chunks = chunker.chunk(&document);
/// ```
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RecursiveChunker {
    /// Create a new `RecursiveChunker`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `chunk_size` is zero or
    /// `chunk_overlap` is not strictly less than `chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(RagError::Config("chunk_size must be greater than zero".to_string()));
        }
        if chunk_overlap >= chunk_size {
            return Err(RagError::Config(format!(
                "chunk_overlap ({chunk_overlap}) must be less than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self { chunk_size, chunk_overlap })
    }

    /// Create a chunker from a [`RagConfig`].
    ///
    /// # Errors
    ///
    /// Same contract as [`new`](RecursiveChunker::new). The config fields
    /// are public, so a hand-built or deserialized config can bypass the
    /// builder; the sizes are checked again here.
    pub fn from_config(config: &RagConfig) -> Result<Self> {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Split raw text into chunk strings without attaching metadata.
    ///
    /// Whitespace-only input yields no chunks.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        // Pieces are capped below chunk_size so that a chunk always has
        // room for its overlap seed plus at least one whole piece.
        let max_piece = self.chunk_size - self.chunk_overlap;
        let mut pieces = Vec::new();
        split_recursive(text, max_piece, &SEPARATORS, &mut pieces);
        merge_pieces(&pieces, self.chunk_size, self.chunk_overlap)
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        self.split_text(&document.text)
            .into_iter()
            .enumerate()
            .map(|(chunk_index, text)| Chunk {
                id: Uuid::new_v4().to_string(),
                text,
                embedding: Vec::new(),
                metadata: document.metadata.clone(),
                chunk_index,
                document_id: document.id.clone(),
            })
            .collect()
    }
}

/// Recursively split `text` into pieces of at most `max` characters,
/// trying separators in order and descending to the next separator only
/// for segments that are still too long.
fn split_recursive(text: &str, max: usize, separators: &[&str], out: &mut Vec<String>) {
    if text.is_empty() {
        return;
    }
    if char_len(text) <= max {
        out.push(text.to_string());
        return;
    }
    let Some((separator, finer)) = separators.split_first() else {
        hard_cut(text, max, out);
        return;
    };

    let segments = split_keeping_separator(text, separator);
    if segments.len() == 1 {
        // Separator not present; try the next one.
        split_recursive(text, max, finer, out);
        return;
    }
    for segment in segments {
        split_recursive(segment, max, finer, out);
    }
}

/// Split text at a separator while keeping the separator attached to the
/// preceding segment, so concatenating the segments reproduces the input.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let mut segments = Vec::new();
    let mut start = 0;

    while let Some(pos) = text[start..].find(separator) {
        let end = start + pos + separator.len();
        segments.push(&text[start..end]);
        start = end;
    }

    if start < text.len() {
        segments.push(&text[start..]);
    }

    segments
}

/// Cut a separator-free run into consecutive windows of `max` characters.
fn hard_cut(text: &str, max: usize, out: &mut Vec<String>) {
    let mut start = 0;
    let mut count = 0;
    for (idx, _) in text.char_indices() {
        if count == max {
            out.push(text[start..idx].to_string());
            start = idx;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() {
        out.push(text[start..].to_string());
    }
}

/// Greedily merge pieces into chunks of at most `chunk_size` characters,
/// seeding every chunk after the first with the final `chunk_overlap`
/// characters of its predecessor.
fn merge_pieces(pieces: &[String], chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    // Character counts for `current` and for the carried seed within it.
    let mut current_len = 0;
    let mut seed_len = 0;

    for piece in pieces {
        let piece_len = char_len(piece);
        if current_len > seed_len && current_len + piece_len > chunk_size {
            let seed = tail_chars(&current, chunk_overlap);
            chunks.push(std::mem::take(&mut current));
            seed_len = char_len(&seed);
            current_len = seed_len;
            current = seed;
        }
        current.push_str(piece);
        current_len += piece_len;
    }

    // A trailing chunk that carries nothing beyond its seed is dropped:
    // its content already ended the previous chunk.
    if current_len > seed_len {
        chunks.push(current);
    }

    chunks
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// The final `n` characters of `s`, or all of `s` if it is shorter.
fn tail_chars(s: &str, n: usize) -> String {
    if n == 0 {
        return String::new();
    }
    let len = char_len(s);
    if len <= n {
        return s.to_string();
    }
    let start = s.char_indices().nth(len - n).map(|(idx, _)| idx).unwrap_or(0);
    s[start..].to_string()
}
