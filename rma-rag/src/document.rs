//! Data types for documents, chunks, and search results.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Metadata attached to a document at load time and inherited unchanged by
/// every chunk cut from it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentMetadata {
    /// Path the document was loaded from.
    pub source_path: PathBuf,
    /// File name component of `source_path`.
    pub filename: String,
    /// Kind tag for downstream consumers. The directory loader always
    /// writes `policy_document`.
    pub document_type: String,
}

/// A source document containing text content and metadata.
///
/// Documents are created by the loader and owned by the ingestion pipeline
/// until chunked; they are never mutated after load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Identifier for the document; the loader uses the file name.
    pub id: String,
    /// The text content of the document.
    pub text: String,
    /// Metadata describing where the document came from.
    pub metadata: DocumentMetadata,
}

impl Document {
    /// Create a document from raw text and metadata.
    pub fn new(id: impl Into<String>, text: impl Into<String>, metadata: DocumentMetadata) -> Self {
        Self { id: id.into(), text: text.into(), metadata }
    }
}

/// A segment of a [`Document`] with its vector embedding.
///
/// Chunks are created once during ingestion and never mutated; the store
/// removes them only when the whole collection is deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Opaque identifier, fresh per ingestion run.
    pub id: String,
    /// The text content of the chunk.
    pub text: String,
    /// The vector embedding for this chunk's text. Empty until the
    /// pipeline attaches one.
    pub embedding: Vec<f32>,
    /// Metadata inherited from the parent document.
    pub metadata: DocumentMetadata,
    /// Position of this chunk within the parent document.
    pub chunk_index: usize,
    /// The ID of the parent [`Document`].
    pub document_id: String,
}

/// A retrieved [`Chunk`] paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}
