//! Query-side retrieval over an ingested collection.
//!
//! [`Retriever`] answers similarity queries against one collection. It is
//! constructed with [`Retriever::open`], which refuses to serve a
//! collection that does not exist or that was embedded with a different
//! model than the active provider. Once open, query-time failures are
//! logged and degrade to an empty result instead of erroring, so a
//! transient embedding or store problem reads as "nothing found" rather
//! than taking the caller down.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::RagConfig;
use crate::document::{Chunk, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

const NO_RESULTS: &str = "No relevant policy documents found.";
const NO_RESULTS_FOR_QUERY: &str = "No relevant policy documents found for this query.";

/// Statistics about a served collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionStats {
    /// The collection name.
    pub collection: String,
    /// Number of stored records.
    pub records: usize,
    /// The embedding model the collection was built with.
    pub embedding_model: String,
}

/// Serves similarity queries against a single ingested collection.
///
/// # Example
///
/// ```rust,ignore
/// use rma_rag::{RagConfig, Retriever};
///
/// let retriever = Retriever::open(embedder, store, "return_policies", &RagConfig::default()).await?;
/// let chunks = retriever.retrieve("how long do refunds take", None).await?;
/// println!("{}", rma_rag::format_results(&chunks));
/// ```
pub struct Retriever {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    collection: String,
    top_k: usize,
}

impl fmt::Debug for Retriever {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retriever")
            .field("collection", &self.collection)
            .field("top_k", &self.top_k)
            .finish_non_exhaustive()
    }
}

impl Retriever {
    /// Open a retriever over an existing collection.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if the collection does not exist or
    /// was built with a different embedding model than the active
    /// provider. Store probe failures surface as [`RagError::Store`].
    pub async fn open(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStore>,
        collection: impl Into<String>,
        config: &RagConfig,
    ) -> Result<Self> {
        let collection = collection.into();
        let meta = vector_store.collection_meta(&collection).await?.ok_or_else(|| {
            RagError::Config(format!(
                "collection '{collection}' does not exist; run ingestion first"
            ))
        })?;

        let active_model = embedding_provider.model_id();
        if meta.embedding_model != active_model {
            return Err(RagError::Config(format!(
                "collection '{collection}' was built with embedding model '{}' but the active \
                 model is '{active_model}'; re-ingest with the active model or switch back",
                meta.embedding_model
            )));
        }

        info!(collection = %collection, model = active_model, "opened retriever");
        Ok(Self { embedding_provider, vector_store, collection, top_k: config.top_k })
    }

    /// The collection this retriever serves.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Retrieve the most relevant chunks for a query.
    ///
    /// `k` overrides the configured `top_k` when given. Query-time
    /// embedding or store failures are logged and yield an empty result.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `k` is `Some(0)`.
    pub async fn retrieve(&self, query: &str, k: Option<usize>) -> Result<Vec<Chunk>> {
        let k = self.resolve_k(k)?;
        let results = self.search(query, k).await;
        Ok(results.into_iter().map(|r| r.chunk).collect())
    }

    /// Retrieve relevant chunks together with their similarity scores.
    ///
    /// Same contract as [`retrieve`](Retriever::retrieve).
    pub async fn retrieve_with_scores(
        &self,
        query: &str,
        k: Option<usize>,
    ) -> Result<Vec<SearchResult>> {
        let k = self.resolve_k(k)?;
        Ok(self.search(query, k).await)
    }

    /// Return record count and model identity for the served collection.
    pub async fn stats(&self) -> Result<CollectionStats> {
        let records = self.vector_store.count(&self.collection).await?;
        info!(collection = %self.collection, records, "collection stats");
        Ok(CollectionStats {
            collection: self.collection.clone(),
            records,
            embedding_model: self.embedding_provider.model_id().to_string(),
        })
    }

    fn resolve_k(&self, k: Option<usize>) -> Result<usize> {
        match k {
            Some(0) => {
                Err(RagError::Config("result count override must be at least 1".to_string()))
            }
            Some(k) => Ok(k),
            None => Ok(self.top_k),
        }
    }

    async fn search(&self, query: &str, k: usize) -> Vec<SearchResult> {
        debug!(k, query_len = query.len(), "retrieving documents");

        let embedding = match self.embedding_provider.embed(query).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!(error = %e, "query embedding failed, returning no results");
                return Vec::new();
            }
        };

        match self.vector_store.search(&self.collection, &embedding, k).await {
            Ok(results) => {
                info!(results = results.len(), "retrieved documents");
                results
            }
            Err(e) => {
                warn!(collection = %self.collection, error = %e, "search failed, returning no results");
                Vec::new()
            }
        }
    }
}

/// Format retrieved chunks into the plain document block.
///
/// Each chunk renders as a `--- Document N (Source: file) ---` section;
/// an empty slice renders a fixed "nothing found" line.
pub fn format_results(chunks: &[Chunk]) -> String {
    if chunks.is_empty() {
        return NO_RESULTS.to_string();
    }

    let parts: Vec<String> = chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            format!(
                "--- Document {} (Source: {}) ---\n{}\n",
                i + 1,
                chunk.metadata.filename,
                chunk.text.trim()
            )
        })
        .collect();

    parts.join("\n")
}

/// Format scored results into the relevance-annotated block.
///
/// Each result renders as a `[Document N - Relevance: S - Source: file]`
/// section, sections separated by `---` lines.
pub fn format_results_with_scores(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return NO_RESULTS_FOR_QUERY.to_string();
    }

    let parts: Vec<String> = results
        .iter()
        .enumerate()
        .map(|(i, result)| {
            format!(
                "[Document {} - Relevance: {:.2} - Source: {}]\n{}\n",
                i + 1,
                result.score,
                result.chunk.metadata.filename,
                result.chunk.text.trim()
            )
        })
        .collect();

    parts.join("\n---\n")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::document::DocumentMetadata;

    fn chunk(filename: &str, text: &str) -> Chunk {
        Chunk {
            id: "c1".to_string(),
            text: text.to_string(),
            embedding: vec![],
            metadata: DocumentMetadata {
                source_path: PathBuf::from(format!("data/{filename}")),
                filename: filename.to_string(),
                document_type: "policy_document".to_string(),
            },
            chunk_index: 0,
            document_id: filename.to_string(),
        }
    }

    #[test]
    fn empty_results_render_fixed_lines() {
        assert_eq!(format_results(&[]), "No relevant policy documents found.");
        assert_eq!(
            format_results_with_scores(&[]),
            "No relevant policy documents found for this query."
        );
    }

    #[test]
    fn plain_format_numbers_documents_and_trims_content() {
        let chunks =
            vec![chunk("returns.txt", "  30 day window.  "), chunk("refunds.txt", "Full refund.")];
        let formatted = format_results(&chunks);
        assert_eq!(
            formatted,
            "--- Document 1 (Source: returns.txt) ---\n30 day window.\n\n\
             --- Document 2 (Source: refunds.txt) ---\nFull refund.\n"
        );
    }

    #[test]
    fn scored_format_shows_two_decimal_relevance() {
        let results = vec![
            SearchResult { chunk: chunk("returns.txt", "30 day window."), score: 0.91234 },
            SearchResult { chunk: chunk("refunds.txt", "Full refund."), score: 0.5 },
        ];
        let formatted = format_results_with_scores(&results);
        assert_eq!(
            formatted,
            "[Document 1 - Relevance: 0.91 - Source: returns.txt]\n30 day window.\n\
             \n---\n\
             [Document 2 - Relevance: 0.50 - Source: refunds.txt]\nFull refund.\n"
        );
    }
}
