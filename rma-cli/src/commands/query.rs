use anyhow::Result;

use rma_rag::{format_results, format_results_with_scores, Retriever};

use crate::config::Settings;

/// Run the `rma query` command: one-shot retrieval against the index.
pub async fn run(
    settings: &Settings,
    text: &str,
    top_k: Option<usize>,
    scores: bool,
) -> Result<()> {
    let provider = super::embedding_provider(settings)?;
    let store = super::vector_store(settings);
    let config = settings.rag_config()?;
    let retriever = Retriever::open(provider, store, settings.collection.as_str(), &config).await?;

    if scores {
        let results = retriever.retrieve_with_scores(text, top_k).await?;
        println!("{}", format_results_with_scores(&results));
    } else {
        let chunks = retriever.retrieve(text, top_k).await?;
        println!("{}", format_results(&chunks));
    }
    Ok(())
}
