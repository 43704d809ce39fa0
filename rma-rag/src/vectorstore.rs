//! Vector store trait for storing and searching vector embeddings.
//!
//! Stores are append-only: records are inserted and never updated in
//! place, and the only removal is deleting a whole collection. The
//! intended lifecycle is "ingest, then serve"; concurrent writers to one
//! collection are not supported.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::{Chunk, SearchResult};
use crate::error::Result;

/// Metadata recorded when a collection is created.
///
/// The embedding-model identity is the load-bearing field: vectors from
/// different models are not comparable, so the retriever refuses to serve
/// a collection whose recorded model differs from the active provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionMeta {
    /// Identity of the model that produced the stored embeddings.
    pub embedding_model: String,
    /// Dimensionality of the stored embeddings.
    pub dimensions: usize,
    /// When the collection was created.
    pub created_at: DateTime<Utc>,
}

impl CollectionMeta {
    /// Create metadata for a new collection, stamped with the current time.
    pub fn new(embedding_model: impl Into<String>, dimensions: usize) -> Self {
        Self { embedding_model: embedding_model.into(), dimensions, created_at: Utc::now() }
    }
}

/// A storage backend for vector embeddings with similarity search.
///
/// Implementations manage named collections of [`Chunk`]s and support
/// appending records and searching by vector similarity.
///
/// # Example
///
/// ```rust,ignore
/// use rma_rag::{CollectionMeta, InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.create_collection("docs", CollectionMeta::new("hash-embedding-64", 64)).await?;
/// store.insert("docs", &chunks).await?;
/// let results = store.search("docs", &query_embedding, 5).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create a named collection with the given metadata.
    ///
    /// No-op if the collection already exists; the existing metadata is
    /// kept. Callers that need to change the model identity must delete
    /// the collection first.
    async fn create_collection(&self, name: &str, meta: CollectionMeta) -> Result<()>;

    /// Return the metadata of a collection, or `None` if it does not exist.
    async fn collection_meta(&self, name: &str) -> Result<Option<CollectionMeta>>;

    /// Delete a named collection and all its data. No-op if absent.
    async fn delete_collection(&self, name: &str) -> Result<()>;

    /// Append chunks to a collection. Chunks must have embeddings set.
    ///
    /// Records are never overwritten; inserting the same content twice
    /// stores it twice. Fails if the collection does not exist or an
    /// embedding's dimensionality disagrees with the collection metadata.
    async fn insert(&self, collection: &str, chunks: &[Chunk]) -> Result<()>;

    /// Search for the `top_k` most similar chunks to the given embedding.
    ///
    /// Returns results ordered by descending cosine similarity. Ties keep
    /// insertion order, so an unchanged collection answers the same query
    /// with the same ordering every time.
    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>>;

    /// Return the number of records stored in a collection.
    async fn count(&self, collection: &str) -> Result<usize>;
}

/// Compute cosine similarity between two vectors.
///
/// Both vectors are L2-normalized before computing the dot product.
/// Returns 0.0 if either vector has zero magnitude.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Score records against a query embedding and keep the `top_k` best.
///
/// The sort is stable, so equal scores preserve the records' insertion
/// order.
pub(crate) fn rank_by_similarity<'a, I>(
    records: I,
    embedding: &[f32],
    top_k: usize,
) -> Vec<SearchResult>
where
    I: IntoIterator<Item = &'a Chunk>,
{
    let mut scored: Vec<SearchResult> = records
        .into_iter()
        .map(|chunk| {
            let score = cosine_similarity(&chunk.embedding, embedding);
            SearchResult { chunk: chunk.clone(), score }
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(top_k);
    scored
}
