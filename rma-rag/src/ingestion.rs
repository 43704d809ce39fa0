//! Ingestion pipeline.
//!
//! [`IngestionPipeline`] drives the load → chunk → embed → store workflow
//! over a directory of policy documents. Embedding happens for the whole
//! batch before anything is written, so a mid-run embedding failure
//! leaves the store exactly as it was. The final insert is a single store
//! call.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rma_rag::{HashEmbedding, IngestionPipeline, InMemoryVectorStore, RecursiveChunker};
//!
//! let pipeline = IngestionPipeline::builder()
//!     .chunker(Arc::new(RecursiveChunker::new(1000, 200)?))
//!     .embedding_provider(Arc::new(HashEmbedding::new(64)))
//!     .vector_store(Arc::new(InMemoryVectorStore::new()))
//!     .build()?;
//!
//! let report = pipeline.run(Path::new("data/policies"), "return_policies").await?;
//! println!("{} chunks written", report.chunks_written);
//! ```

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::chunking::Chunker;
use crate::document::Chunk;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::loader;
use crate::vectorstore::{CollectionMeta, VectorStore};

/// Counts describing one ingestion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionReport {
    /// Documents successfully loaded from the source directory.
    pub documents_loaded: usize,
    /// Supported files that could not be loaded.
    pub documents_skipped: usize,
    /// Records appended to the collection.
    pub chunks_written: usize,
}

/// The document ingestion pipeline.
///
/// Construct one via [`IngestionPipeline::builder()`].
pub struct IngestionPipeline {
    chunker: Arc<dyn Chunker>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
}

impl IngestionPipeline {
    /// Create a new [`IngestionPipelineBuilder`].
    pub fn builder() -> IngestionPipelineBuilder {
        IngestionPipelineBuilder::default()
    }

    /// Ingest every supported document under `source_dir` into `collection`.
    ///
    /// The collection is created on first use, recording the active
    /// embedding model and the dimensionality of the vectors it produced.
    /// Re-running against an existing collection appends; it never
    /// replaces records.
    ///
    /// # Errors
    ///
    /// - [`RagError::Ingestion`] if no documents load, or if embedding
    ///   fails (in which case nothing was written).
    /// - [`RagError::Config`] if the collection exists but was built with
    ///   a different embedding model.
    /// - [`RagError::Store`] if the final insert fails.
    pub async fn run(&self, source_dir: &Path, collection: &str) -> Result<IngestionReport> {
        info!(directory = %source_dir.display(), collection, "starting ingestion");

        // Directory loading (including the PDF parse) is blocking I/O.
        let source = source_dir.to_path_buf();
        let load = tokio::task::spawn_blocking(move || loader::load_directory(&source))
            .await
            .map_err(|e| RagError::Ingestion(format!("document loading task failed: {e}")))??;
        if load.documents.is_empty() {
            return Err(RagError::Ingestion(format!(
                "no documents found in '{}'",
                source_dir.display()
            )));
        }

        let mut chunks: Vec<Chunk> = Vec::new();
        for document in &load.documents {
            let document_chunks = self.chunker.chunk(document);
            debug!(document = %document.id, chunks = document_chunks.len(), "chunked document");
            chunks.extend(document_chunks);
        }
        info!(documents = load.documents.len(), chunks = chunks.len(), "chunked documents");

        // Embed everything up front. Failing here must leave the store
        // untouched, hence no store call has happened yet.
        if !chunks.is_empty() {
            let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
            let embeddings = self.embedding_provider.embed_batch(&texts).await.map_err(|e| {
                error!(error = %e, "embedding failed, nothing was written");
                RagError::Ingestion(format!("embedding failed: {e}"))
            })?;
            for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
                chunk.embedding = embedding;
            }
        }

        // Record the dimensionality the provider actually produced; its
        // advertised size may be a default it kept for an unrecognized model.
        let dimensions = chunks
            .first()
            .map(|chunk| chunk.embedding.len())
            .unwrap_or_else(|| self.embedding_provider.dimensions());
        self.prepare_collection(collection, dimensions).await?;

        if !chunks.is_empty() {
            self.vector_store.insert(collection, &chunks).await?;
        }

        let report = IngestionReport {
            documents_loaded: load.documents.len(),
            documents_skipped: load.skipped.len(),
            chunks_written: chunks.len(),
        };
        info!(
            documents = report.documents_loaded,
            skipped = report.documents_skipped,
            chunks = report.chunks_written,
            "ingestion complete"
        );
        Ok(report)
    }

    /// Create the collection if absent, or verify that an existing one was
    /// built with the active embedding model.
    ///
    /// `dimensions` comes from the embeddings just produced, so the
    /// recorded size matches the vectors about to be stored even when the
    /// provider advertises a different one.
    async fn prepare_collection(&self, collection: &str, dimensions: usize) -> Result<()> {
        let model = self.embedding_provider.model_id();
        match self.vector_store.collection_meta(collection).await? {
            Some(meta) if meta.embedding_model != model => Err(RagError::Config(format!(
                "collection '{collection}' was built with embedding model '{}' but the active \
                 model is '{model}'; delete the collection to re-ingest",
                meta.embedding_model
            ))),
            Some(_) => Ok(()),
            None => {
                let meta = CollectionMeta::new(model, dimensions);
                self.vector_store.create_collection(collection, meta).await
            }
        }
    }
}

/// Builder for constructing an [`IngestionPipeline`].
///
/// All fields are required. Call [`build()`](IngestionPipelineBuilder::build)
/// to validate and produce the pipeline.
#[derive(Default)]
pub struct IngestionPipelineBuilder {
    chunker: Option<Arc<dyn Chunker>>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
}

impl IngestionPipelineBuilder {
    /// Set the document chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Build the [`IngestionPipeline`], validating that all fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if any field is missing.
    pub fn build(self) -> Result<IngestionPipeline> {
        let chunker =
            self.chunker.ok_or_else(|| RagError::Config("chunker is required".to_string()))?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::Config("embedding_provider is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RagError::Config("vector_store is required".to_string()))?;

        Ok(IngestionPipeline { chunker, embedding_provider, vector_store })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inmemory::InMemoryVectorStore;
    use crate::mock::HashEmbedding;
    use crate::RecursiveChunker;

    #[test]
    fn builder_requires_every_component() {
        assert!(IngestionPipeline::builder().build().is_err());

        let missing_store = IngestionPipeline::builder()
            .chunker(Arc::new(RecursiveChunker::new(100, 10).unwrap()))
            .embedding_provider(Arc::new(HashEmbedding::new(8)))
            .build();
        assert!(missing_store.is_err());

        let complete = IngestionPipeline::builder()
            .chunker(Arc::new(RecursiveChunker::new(100, 10).unwrap()))
            .embedding_provider(Arc::new(HashEmbedding::new(8)))
            .vector_store(Arc::new(InMemoryVectorStore::new()))
            .build();
        assert!(complete.is_ok());
    }
}
