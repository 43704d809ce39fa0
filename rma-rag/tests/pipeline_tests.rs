//! End-to-end ingestion pipeline tests over temporary directories.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use rma_rag::{
    EmbeddingProvider, HashEmbedding, IngestionPipeline, InMemoryVectorStore, LocalVectorStore,
    RagConfig, RagError, RecursiveChunker, Retriever, VectorStore,
};

const COLLECTION: &str = "return_policies";

/// An embedding provider that always fails, for exercising the
/// nothing-written guarantee.
struct FailingEmbedding;

#[async_trait]
impl EmbeddingProvider for FailingEmbedding {
    async fn embed(&self, _text: &str) -> rma_rag::Result<Vec<f32>> {
        Err(RagError::Embedding {
            provider: "failing".to_string(),
            message: "synthetic failure".to_string(),
        })
    }

    fn dimensions(&self) -> usize {
        8
    }

    fn model_id(&self) -> &str {
        "failing-model"
    }
}

/// An embedding provider whose advertised dimensionality does not match
/// the vectors it returns, as happens when a client falls back to a
/// default size for a model it does not recognize.
struct MisadvertisedEmbedding {
    vectors: HashEmbedding,
    advertised: usize,
}

#[async_trait]
impl EmbeddingProvider for MisadvertisedEmbedding {
    async fn embed(&self, text: &str) -> rma_rag::Result<Vec<f32>> {
        self.vectors.embed(text).await
    }

    fn dimensions(&self) -> usize {
        self.advertised
    }

    fn model_id(&self) -> &str {
        "unrecognized-model"
    }
}

fn pipeline(
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
) -> IngestionPipeline {
    IngestionPipeline::builder()
        .chunker(Arc::new(RecursiveChunker::new(120, 20).unwrap()))
        .embedding_provider(embedder)
        .vector_store(store)
        .build()
        .unwrap()
}

fn write(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_directory_is_an_ingestion_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(InMemoryVectorStore::new());
    let err = pipeline(Arc::new(HashEmbedding::new(8)), store.clone())
        .run(dir.path(), COLLECTION)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("no documents found"));
    assert!(store.collection_meta(COLLECTION).await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn unsupported_files_alone_count_as_no_documents() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "spreadsheet.csv", "category,days\ngeneral,30");

    let store = Arc::new(InMemoryVectorStore::new());
    let err = pipeline(Arc::new(HashEmbedding::new(8)), store)
        .run(dir.path(), COLLECTION)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("no documents found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn mixed_directory_loads_supported_files_and_reports_skips() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "returns.txt", "Items may be returned within 30 days of purchase.");
    write(dir.path(), "refunds.md", "# Refunds\nRefunds are issued within 5 business days.");
    write(dir.path(), "junk.bin", "not a policy");
    write(dir.path(), "broken.pdf", "not really a pdf");

    let store = Arc::new(InMemoryVectorStore::new());
    let report = pipeline(Arc::new(HashEmbedding::new(8)), store.clone())
        .run(dir.path(), COLLECTION)
        .await
        .unwrap();

    assert_eq!(report.documents_loaded, 2);
    assert_eq!(report.documents_skipped, 1);
    assert!(report.chunks_written >= 1);
    assert_eq!(store.count(COLLECTION).await.unwrap(), report.chunks_written);

    let meta = store.collection_meta(COLLECTION).await.unwrap().unwrap();
    assert_eq!(meta.embedding_model, "hash-embedding-8");
    assert_eq!(meta.dimensions, 8);
}

#[tokio::test(flavor = "multi_thread")]
async fn recorded_dimensions_follow_the_produced_vectors() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "returns.txt", "Items may be returned within 30 days of purchase.");

    let store = Arc::new(InMemoryVectorStore::new());
    let provider =
        Arc::new(MisadvertisedEmbedding { vectors: HashEmbedding::new(32), advertised: 8 });
    let report = pipeline(provider, store.clone()).run(dir.path(), COLLECTION).await.unwrap();

    assert!(report.chunks_written >= 1);
    assert_eq!(store.count(COLLECTION).await.unwrap(), report.chunks_written);

    // The stored vectors are 32-wide, and the collection must say so even
    // though the provider claimed 8.
    let meta = store.collection_meta(COLLECTION).await.unwrap().unwrap();
    assert_eq!(meta.dimensions, 32);
}

#[tokio::test(flavor = "multi_thread")]
async fn embedding_failure_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "returns.txt", "Items may be returned within 30 days of purchase.");

    let store = Arc::new(InMemoryVectorStore::new());
    let err = pipeline(Arc::new(FailingEmbedding), store.clone())
        .run(dir.path(), COLLECTION)
        .await
        .unwrap_err();

    assert!(matches!(err, RagError::Ingestion(_)));
    assert!(store.collection_meta(COLLECTION).await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn rerunning_ingestion_appends_records() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "returns.txt", "Items may be returned within 30 days of purchase.");

    let store = Arc::new(InMemoryVectorStore::new());
    let embedder = Arc::new(HashEmbedding::new(8));

    let first = pipeline(embedder.clone(), store.clone()).run(dir.path(), COLLECTION).await.unwrap();
    let second =
        pipeline(embedder, store.clone()).run(dir.path(), COLLECTION).await.unwrap();

    assert_eq!(first.chunks_written, second.chunks_written);
    assert_eq!(
        store.count(COLLECTION).await.unwrap(),
        first.chunks_written + second.chunks_written
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn extending_with_a_different_model_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "returns.txt", "Items may be returned within 30 days of purchase.");

    let store = Arc::new(InMemoryVectorStore::new());
    pipeline(Arc::new(HashEmbedding::new(8)), store.clone())
        .run(dir.path(), COLLECTION)
        .await
        .unwrap();
    let before = store.count(COLLECTION).await.unwrap();

    let other = Arc::new(HashEmbedding::new(8).with_model("rival-model"));
    let err = pipeline(other, store.clone()).run(dir.path(), COLLECTION).await.unwrap_err();

    assert!(matches!(err, RagError::Config(_)));
    assert!(err.to_string().contains("delete the collection"));
    assert_eq!(store.count(COLLECTION).await.unwrap(), before);
}

#[tokio::test(flavor = "multi_thread")]
async fn ingest_then_serve_round_trip_on_disk() {
    let data = tempfile::tempdir().unwrap();
    let index = tempfile::tempdir().unwrap();
    write(data.path(), "returns.txt", "Items may be returned within 30 days of purchase.");
    write(data.path(), "refunds.md", "Refunds are issued within 5 business days of receipt.");

    let embedder = Arc::new(HashEmbedding::new(16));
    {
        let store = Arc::new(LocalVectorStore::new(index.path()));
        pipeline(embedder.clone(), store).run(data.path(), COLLECTION).await.unwrap();
    }

    // A fresh store instance over the same directory serves the data.
    let store = Arc::new(LocalVectorStore::new(index.path()));
    let config = RagConfig::default();
    let retriever = Retriever::open(embedder, store, COLLECTION, &config).await.unwrap();

    let chunks = retriever.retrieve("how long do I have to return an item", None).await.unwrap();
    assert!(!chunks.is_empty());
    assert!(chunks.len() <= config.top_k);

    let formatted = rma_rag::format_results(&chunks);
    assert!(formatted.starts_with("--- Document 1 (Source: "));
}
