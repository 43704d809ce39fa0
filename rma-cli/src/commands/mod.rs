//! One module per subcommand, plus the constructors they share.

pub mod check;
pub mod ingest;
pub mod query;
pub mod stats;
pub mod summarize;

use std::sync::Arc;

use anyhow::Result;
use rma_rag::{EmbeddingProvider, LocalVectorStore, OpenAiEmbedding, VectorStore};

use crate::config::Settings;

pub(crate) fn embedding_provider(settings: &Settings) -> Result<Arc<dyn EmbeddingProvider>> {
    let api_key = settings.require_api_key()?;
    let provider = OpenAiEmbedding::new(api_key)?.with_model(&settings.embedding_model);
    Ok(Arc::new(provider))
}

pub(crate) fn vector_store(settings: &Settings) -> Arc<dyn VectorStore> {
    Arc::new(LocalVectorStore::new(&settings.index_dir))
}
