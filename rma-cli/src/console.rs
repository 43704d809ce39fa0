//! The interactive query session, started when `rma` runs without a
//! subcommand.

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::info;

use rma_rag::{format_results, Retriever, VectorStore};

use crate::commands;
use crate::config::Settings;

const QUIT_WORDS: [&str; 3] = ["quit", "exit", "q"];

fn is_quit(input: &str) -> bool {
    QUIT_WORDS.contains(&input.to_lowercase().as_str())
}

/// Run the interactive query loop.
///
/// If the collection does not exist yet, the policy directory is
/// ingested first so a fresh checkout works without a separate setup
/// step. Queries are answered until a quit word or end of input.
pub async fn run_console(settings: &Settings) -> Result<()> {
    let store = commands::vector_store(settings);
    if store.collection_meta(&settings.collection).await?.is_none() {
        info!("policy index not found, ingesting documents first");
        commands::ingest::run(settings, false).await?;
    } else {
        info!("using existing policy index");
    }

    let provider = commands::embedding_provider(settings)?;
    let config = settings.rag_config()?;
    let retriever = Retriever::open(provider, store, settings.collection.as_str(), &config).await?;

    println!("Return & Refund Policy Assistant");
    println!("Type 'quit' or 'exit' to end the session.");

    let mut editor = DefaultEditor::new()?;
    loop {
        match editor.readline("\nCustomer Query: ") {
            Ok(line) => {
                let query = line.trim();
                if query.is_empty() {
                    continue;
                }
                if is_quit(query) {
                    println!("Ending session. Goodbye!");
                    break;
                }
                let _ = editor.add_history_entry(query);
                let chunks = retriever.retrieve(query, None).await?;
                println!("\n{}", format_results(&chunks));
            }
            Err(ReadlineError::Interrupted) => {
                println!("\nSession interrupted. Goodbye!");
                break;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}
