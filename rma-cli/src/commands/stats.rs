use anyhow::Result;

use rma_rag::Retriever;

use crate::config::Settings;

/// Run the `rma stats` command.
pub async fn run(settings: &Settings) -> Result<()> {
    let provider = super::embedding_provider(settings)?;
    let store = super::vector_store(settings);
    let config = settings.rag_config()?;
    let retriever = Retriever::open(provider, store, settings.collection.as_str(), &config).await?;

    let stats = retriever.stats().await?;
    println!("Collection:      {}", stats.collection);
    println!("Stored records:  {}", stats.records);
    println!("Embedding model: {}", stats.embedding_model);
    Ok(())
}
