//! In-memory vector store using cosine similarity.
//!
//! This module provides [`InMemoryVectorStore`], a vector store backed by
//! a `HashMap` protected by a `tokio::sync::RwLock`. Nothing is persisted;
//! it is suitable for tests and ephemeral sessions.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{Chunk, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::{rank_by_similarity, CollectionMeta, VectorStore};

struct Collection {
    meta: CollectionMeta,
    /// Records in insertion order. Append-only.
    records: Vec<Chunk>,
}

/// An in-memory vector store using cosine similarity for search.
///
/// Collections keep their records in insertion order, which makes search
/// results deterministic for an unchanged collection. All operations are
/// async-safe via `tokio::sync::RwLock`.
///
/// # Example
///
/// ```rust,ignore
/// use rma_rag::{CollectionMeta, InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.create_collection("docs", CollectionMeta::new("hash-embedding-64", 64)).await?;
/// ```
#[derive(Default)]
pub struct InMemoryVectorStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl InMemoryVectorStore {
    /// Create a new empty in-memory vector store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn missing(collection: &str) -> RagError {
    RagError::Store {
        backend: "InMemory".to_string(),
        message: format!("collection '{collection}' does not exist"),
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn create_collection(&self, name: &str, meta: CollectionMeta) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections
            .entry(name.to_string())
            .or_insert_with(|| Collection { meta, records: Vec::new() });
        Ok(())
    }

    async fn collection_meta(&self, name: &str) -> Result<Option<CollectionMeta>> {
        let collections = self.collections.read().await;
        Ok(collections.get(name).map(|c| c.meta.clone()))
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections.remove(name);
        Ok(())
    }

    async fn insert(&self, collection: &str, chunks: &[Chunk]) -> Result<()> {
        let mut collections = self.collections.write().await;
        let stored = collections.get_mut(collection).ok_or_else(|| missing(collection))?;
        for chunk in chunks {
            if chunk.embedding.len() != stored.meta.dimensions {
                return Err(RagError::Store {
                    backend: "InMemory".to_string(),
                    message: format!(
                        "chunk '{}' has dimension {}, collection '{collection}' expects {}",
                        chunk.id,
                        chunk.embedding.len(),
                        stored.meta.dimensions
                    ),
                });
            }
        }
        stored.records.extend(chunks.iter().cloned());
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let collections = self.collections.read().await;
        let stored = collections.get(collection).ok_or_else(|| missing(collection))?;
        Ok(rank_by_similarity(&stored.records, embedding, top_k))
    }

    async fn count(&self, collection: &str) -> Result<usize> {
        let collections = self.collections.read().await;
        let stored = collections.get(collection).ok_or_else(|| missing(collection))?;
        Ok(stored.records.len())
    }
}
