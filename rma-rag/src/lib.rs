//! # rma-rag
//!
//! Document ingestion and retrieval for the RMA return/refund assistant.
//!
//! The crate covers the full "ingest, then serve" lifecycle for a
//! directory of policy documents:
//!
//! - **Loading**: `.pdf`, `.txt`, and `.md` files from a flat directory
//!   ([`loader`]).
//! - **Chunking**: recursive splitting with exact character overlap
//!   between adjacent chunks ([`RecursiveChunker`]).
//! - **Embedding**: the [`EmbeddingProvider`] seam with an OpenAI client
//!   ([`OpenAiEmbedding`]) and a deterministic offline provider
//!   ([`HashEmbedding`]).
//! - **Storage**: the append-only [`VectorStore`] seam with an in-memory
//!   backend and a directory-backed persistent backend
//!   ([`LocalVectorStore`]).
//! - **Retrieval**: [`Retriever`] with model-identity validation and
//!   formatted output blocks for downstream consumers.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use rma_rag::{
//!     HashEmbedding, IngestionPipeline, LocalVectorStore, RagConfig, RecursiveChunker, Retriever,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = RagConfig::default();
//!     let embedder = Arc::new(HashEmbedding::new(64));
//!     let store = Arc::new(LocalVectorStore::new("./policy_index"));
//!
//!     let pipeline = IngestionPipeline::builder()
//!         .chunker(Arc::new(RecursiveChunker::from_config(&config)?))
//!         .embedding_provider(embedder.clone())
//!         .vector_store(store.clone())
//!         .build()?;
//!     pipeline.run(Path::new("data/policies"), "return_policies").await?;
//!
//!     let retriever = Retriever::open(embedder, store, "return_policies", &config).await?;
//!     let chunks = retriever.retrieve("how long do refunds take", None).await?;
//!     println!("{}", rma_rag::format_results(&chunks));
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod ingestion;
pub mod inmemory;
pub mod loader;
pub mod local;
pub mod mock;
pub mod openai;
pub mod retriever;
pub mod vectorstore;

pub use chunking::{Chunker, RecursiveChunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, Document, DocumentMetadata, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use ingestion::{IngestionPipeline, IngestionPipelineBuilder, IngestionReport};
pub use inmemory::InMemoryVectorStore;
pub use loader::{load_directory, load_file, DirectoryLoad, SkippedFile};
pub use local::LocalVectorStore;
pub use mock::HashEmbedding;
pub use openai::OpenAiEmbedding;
pub use retriever::{format_results, format_results_with_scores, CollectionStats, Retriever};
pub use vectorstore::{CollectionMeta, VectorStore};
