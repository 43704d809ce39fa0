//! Error types for the `rma-rag` crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during ingestion and retrieval.
#[derive(Debug, Error)]
pub enum RagError {
    /// A configuration validation error. Fatal: surfaced before any work
    /// begins.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A fatal error in an ingestion run (no documents found, or the
    /// embedding service failed mid-run). Previously persisted collections
    /// are not affected.
    #[error("Ingestion error: {0}")]
    Ingestion(String),

    /// A single document could not be loaded. Recovered by the pipeline:
    /// the file is skipped and the run continues.
    #[error("Failed to load document '{path}': {message}")]
    DocumentLoad {
        /// The file that could not be read.
        path: PathBuf,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    Store {
        /// The store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },
}

/// A convenience result type for ingestion and retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
