use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use rma_rag::{IngestionPipeline, RecursiveChunker, VectorStore};

use crate::config::Settings;

/// Run the `rma ingest` command.
pub async fn run(settings: &Settings, reingest: bool) -> Result<()> {
    let store = super::vector_store(settings);
    if reingest {
        info!(collection = %settings.collection, "removing existing collection");
        store.delete_collection(&settings.collection).await?;
    }

    let config = settings.rag_config()?;
    let pipeline = IngestionPipeline::builder()
        .chunker(Arc::new(RecursiveChunker::from_config(&config)?))
        .embedding_provider(super::embedding_provider(settings)?)
        .vector_store(store)
        .build()?;

    let report = pipeline.run(&settings.data_dir, &settings.collection).await?;
    println!(
        "Ingested {} documents into '{}' ({} skipped, {} chunks written)",
        report.documents_loaded,
        settings.collection,
        report.documents_skipped,
        report.chunks_written,
    );
    Ok(())
}
