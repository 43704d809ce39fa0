use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use rma_rag::RagConfig;

/// The placeholder shipped in `.env.example`; treated as unset.
const PLACEHOLDER_API_KEY: &str = "your_openai_api_key_here";

/// Runtime settings resolved from the environment.
///
/// A `.env` file in the working directory is loaded first when present;
/// real environment variables win over it. Commands that never touch the
/// embedding API (`check`, `summarize`) work without an API key.
#[derive(Debug, Clone)]
pub struct Settings {
    pub openai_api_key: Option<String>,
    pub embedding_model: String,
    pub data_dir: PathBuf,
    pub index_dir: PathBuf,
    pub collection: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        // Optional; a missing .env file is not an error.
        let _ = dotenvy::dotenv();

        Ok(Self {
            openai_api_key: sanitize_key(env::var("OPENAI_API_KEY").ok()),
            embedding_model: string_var("EMBEDDING_MODEL", "text-embedding-3-small"),
            data_dir: PathBuf::from(string_var("RMA_DATA_DIR", "data/policies")),
            index_dir: PathBuf::from(string_var("RMA_INDEX_DIR", "./policy_index")),
            collection: string_var("RMA_COLLECTION", "return_policies"),
            chunk_size: numeric_var("CHUNK_SIZE", 1000)?,
            chunk_overlap: numeric_var("CHUNK_OVERLAP", 200)?,
            top_k: numeric_var("TOP_K_RESULTS", 3)?,
        })
    }

    /// The API key, or a setup error telling the user how to provide one.
    pub fn require_api_key(&self) -> Result<&str> {
        match &self.openai_api_key {
            Some(key) => Ok(key),
            None => {
                bail!("OPENAI_API_KEY is not set; copy .env.example to .env and fill in your key")
            }
        }
    }

    /// Chunking and retrieval parameters as a validated RAG configuration.
    pub fn rag_config(&self) -> Result<RagConfig> {
        Ok(RagConfig::builder()
            .chunk_size(self.chunk_size)
            .chunk_overlap(self.chunk_overlap)
            .top_k(self.top_k)
            .build()?)
    }
}

fn sanitize_key(raw: Option<String>) -> Option<String> {
    raw.filter(|key| !key.is_empty() && key.as_str() != PLACEHOLDER_API_KEY)
}

fn string_var(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn numeric_var(name: &str, default: usize) -> Result<usize> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{name} must be a non-negative integer, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
