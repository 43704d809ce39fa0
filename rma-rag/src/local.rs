//! Directory-backed vector store.
//!
//! [`LocalVectorStore`] persists each collection under
//! `<root>/<collection>/` as two files: `meta.json` holding the
//! [`CollectionMeta`] and `records.jsonl` holding one serde-encoded record
//! per line. Inserts append to the record file in a single write, so a
//! collection survives restarts and a missing directory is simply an
//! absent collection.
//!
//! Records are cached in memory after the first touch of a collection.
//! The store assumes it is the only writer for its root directory.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::debug;

use crate::document::{Chunk, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::{rank_by_similarity, CollectionMeta, VectorStore};

const META_FILE: &str = "meta.json";
const RECORDS_FILE: &str = "records.jsonl";

struct Collection {
    meta: CollectionMeta,
    /// Records in file order. Append-only.
    records: Vec<Chunk>,
}

/// A vector store persisted as plain files under a root directory.
///
/// # Example
///
/// ```rust,ignore
/// use rma_rag::{CollectionMeta, LocalVectorStore, VectorStore};
///
/// let store = LocalVectorStore::new("./policy_index");
/// store.create_collection("return_policies", CollectionMeta::new("text-embedding-3-small", 1536)).await?;
/// ```
pub struct LocalVectorStore {
    root: PathBuf,
    cache: RwLock<HashMap<String, Collection>>,
}

impl LocalVectorStore {
    /// Create a store rooted at the given directory.
    ///
    /// The directory does not need to exist yet; it is created the first
    /// time a collection is created.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), cache: RwLock::new(HashMap::new()) }
    }

    /// The root directory this store persists into.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn meta_path(&self, name: &str) -> PathBuf {
        self.collection_dir(name).join(META_FILE)
    }

    fn records_path(&self, name: &str) -> PathBuf {
        self.collection_dir(name).join(RECORDS_FILE)
    }

    /// Load a collection from disk into the cache if it is not cached yet.
    ///
    /// Returns `false` if the collection exists neither in the cache nor
    /// on disk.
    async fn ensure_loaded(&self, name: &str) -> Result<bool> {
        {
            let cache = self.cache.read().await;
            if cache.contains_key(name) {
                return Ok(true);
            }
        }

        let Some(loaded) = self.load_from_disk(name).await? else {
            return Ok(false);
        };

        let mut cache = self.cache.write().await;
        cache.entry(name.to_string()).or_insert(loaded);
        Ok(true)
    }

    async fn load_from_disk(&self, name: &str) -> Result<Option<Collection>> {
        let meta_path = self.meta_path(name);
        let raw = match tokio::fs::read(&meta_path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(store_error(format!(
                    "failed to read '{}': {e}",
                    meta_path.display()
                )));
            }
        };
        let meta: CollectionMeta = serde_json::from_slice(&raw).map_err(|e| {
            store_error(format!("corrupt metadata in '{}': {e}", meta_path.display()))
        })?;

        let records_path = self.records_path(name);
        let records = match tokio::fs::read_to_string(&records_path).await {
            Ok(contents) => parse_records(&contents, &records_path)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(store_error(format!(
                    "failed to read '{}': {e}",
                    records_path.display()
                )));
            }
        };

        debug!(collection = name, records = records.len(), "loaded collection from disk");
        Ok(Some(Collection { meta, records }))
    }
}

fn store_error(message: impl Into<String>) -> RagError {
    RagError::Store { backend: "Local".to_string(), message: message.into() }
}

fn missing(collection: &str) -> RagError {
    store_error(format!("collection '{collection}' does not exist"))
}

/// Collection names become directory names, so path-ish names are refused.
fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
        return Err(store_error(format!("invalid collection name '{name}'")));
    }
    Ok(())
}

fn parse_records(contents: &str, path: &Path) -> Result<Vec<Chunk>> {
    let mut records = Vec::new();
    for (line_no, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let chunk: Chunk = serde_json::from_str(line).map_err(|e| {
            store_error(format!("corrupt record at {}:{}: {e}", path.display(), line_no + 1))
        })?;
        records.push(chunk);
    }
    Ok(records)
}

#[async_trait]
impl VectorStore for LocalVectorStore {
    async fn create_collection(&self, name: &str, meta: CollectionMeta) -> Result<()> {
        validate_name(name)?;
        if self.ensure_loaded(name).await? {
            return Ok(());
        }

        let dir = self.collection_dir(name);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| store_error(format!("failed to create '{}': {e}", dir.display())))?;

        let meta_path = self.meta_path(name);
        let raw = serde_json::to_vec_pretty(&meta)
            .map_err(|e| store_error(format!("failed to encode collection metadata: {e}")))?;
        tokio::fs::write(&meta_path, raw)
            .await
            .map_err(|e| store_error(format!("failed to write '{}': {e}", meta_path.display())))?;

        let mut cache = self.cache.write().await;
        cache.insert(name.to_string(), Collection { meta, records: Vec::new() });
        Ok(())
    }

    async fn collection_meta(&self, name: &str) -> Result<Option<CollectionMeta>> {
        validate_name(name)?;
        if !self.ensure_loaded(name).await? {
            return Ok(None);
        }
        let cache = self.cache.read().await;
        Ok(cache.get(name).map(|c| c.meta.clone()))
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        validate_name(name)?;
        {
            let mut cache = self.cache.write().await;
            cache.remove(name);
        }
        let dir = self.collection_dir(name);
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(store_error(format!("failed to delete '{}': {e}", dir.display()))),
        }
    }

    async fn insert(&self, collection: &str, chunks: &[Chunk]) -> Result<()> {
        validate_name(collection)?;
        if !self.ensure_loaded(collection).await? {
            return Err(missing(collection));
        }

        let dimensions = {
            let cache = self.cache.read().await;
            cache.get(collection).map(|c| c.meta.dimensions).ok_or_else(|| missing(collection))?
        };
        for chunk in chunks {
            if chunk.embedding.len() != dimensions {
                return Err(store_error(format!(
                    "chunk '{}' has dimension {}, collection '{collection}' expects {dimensions}",
                    chunk.id,
                    chunk.embedding.len()
                )));
            }
        }

        // Encode the whole batch first so a serialization failure cannot
        // leave a partially written file.
        let mut buffer = String::new();
        for chunk in chunks {
            let line = serde_json::to_string(chunk)
                .map_err(|e| store_error(format!("failed to encode record '{}': {e}", chunk.id)))?;
            buffer.push_str(&line);
            buffer.push('\n');
        }

        let records_path = self.records_path(collection);
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&records_path)
            .await
            .map_err(|e| store_error(format!("failed to open '{}': {e}", records_path.display())))?;
        file.write_all(buffer.as_bytes())
            .await
            .map_err(|e| store_error(format!("failed to write '{}': {e}", records_path.display())))?;
        file.flush()
            .await
            .map_err(|e| store_error(format!("failed to flush '{}': {e}", records_path.display())))?;

        let mut cache = self.cache.write().await;
        if let Some(stored) = cache.get_mut(collection) {
            stored.records.extend(chunks.iter().cloned());
        }
        debug!(collection, appended = chunks.len(), "appended records");
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        validate_name(collection)?;
        if !self.ensure_loaded(collection).await? {
            return Err(missing(collection));
        }
        let cache = self.cache.read().await;
        let stored = cache.get(collection).ok_or_else(|| missing(collection))?;
        Ok(rank_by_similarity(&stored.records, embedding, top_k))
    }

    async fn count(&self, collection: &str) -> Result<usize> {
        validate_name(collection)?;
        if !self.ensure_loaded(collection).await? {
            return Err(missing(collection));
        }
        let cache = self.cache.read().await;
        let stored = cache.get(collection).ok_or_else(|| missing(collection))?;
        Ok(stored.records.len())
    }
}
