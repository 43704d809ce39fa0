//! Search ordering and persistence tests for the vector stores.

use std::path::PathBuf;

use proptest::prelude::*;
use rma_rag::document::{Chunk, DocumentMetadata};
use rma_rag::inmemory::InMemoryVectorStore;
use rma_rag::local::LocalVectorStore;
use rma_rag::vectorstore::{CollectionMeta, VectorStore};

fn metadata() -> DocumentMetadata {
    DocumentMetadata {
        source_path: PathBuf::from("data/policies/returns.txt"),
        filename: "returns.txt".to_string(),
        document_type: "policy_document".to_string(),
    }
}

fn chunk(id: &str, text: &str, embedding: Vec<f32>) -> Chunk {
    Chunk {
        id: id.to_string(),
        text: text.to_string(),
        embedding,
        metadata: metadata(),
        chunk_index: 0,
        document_id: "returns.txt".to_string(),
    }
}

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map("non-zero embedding", |mut v| {
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm < 1e-8 {
            return None;
        }
        for val in &mut v {
            *val /= norm;
        }
        Some(v)
    })
}

/// Generate a chunk with a normalized embedding.
fn arb_chunk(dim: usize) -> impl Strategy<Value = Chunk> {
    ("[a-z]{3,8}", "[a-z ]{5,30}", arb_normalized_embedding(dim))
        .prop_map(|(id, text, embedding)| chunk(&id, &text, embedding))
}

/// For any set of stored records, search returns results in descending
/// score order, and the result count is exactly the smaller of `top_k`
/// and the number of stored records (the store never deduplicates).
mod prop_search_ordering {
    use super::*;

    const DIM: usize = 16;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn results_ordered_descending_and_bounded_by_top_k(
            chunks in proptest::collection::vec(arb_chunk(DIM), 1..20),
            query in arb_normalized_embedding(DIM),
            top_k in 1usize..25,
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let stored = chunks.len();
            let results = rt.block_on(async {
                let store = InMemoryVectorStore::new();
                store
                    .create_collection("test", CollectionMeta::new("hash-embedding-16", DIM))
                    .await
                    .unwrap();
                store.insert("test", &chunks).await.unwrap();
                store.search("test", &query, top_k).await.unwrap()
            });

            prop_assert_eq!(results.len(), top_k.min(stored));

            for window in results.windows(2) {
                prop_assert!(
                    window[0].score >= window[1].score,
                    "results not in descending order: {} < {}",
                    window[0].score,
                    window[1].score,
                );
            }
        }
    }
}

mod local_persistence {
    use super::*;

    fn meta() -> CollectionMeta {
        CollectionMeta::new("hash-embedding-2", 2)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn records_survive_a_reopened_store() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = LocalVectorStore::new(dir.path());
            store.create_collection("policies", meta()).await.unwrap();
            store
                .insert(
                    "policies",
                    &[
                        chunk("a", "thirty day window", vec![1.0, 0.0]),
                        chunk("b", "refunds in five days", vec![0.0, 1.0]),
                    ],
                )
                .await
                .unwrap();
        }

        let reopened = LocalVectorStore::new(dir.path());
        assert_eq!(reopened.count("policies").await.unwrap(), 2);

        let results = reopened.search("policies", &[1.0, 0.0], 1).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.id, "a");
        assert_eq!(results[0].chunk.text, "thirty day window");
        assert_eq!(results[0].chunk.metadata, metadata());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn metadata_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let written = meta();

        {
            let store = LocalVectorStore::new(dir.path());
            store.create_collection("policies", written.clone()).await.unwrap();
        }

        let reopened = LocalVectorStore::new(dir.path());
        let read = reopened.collection_meta("policies").await.unwrap().unwrap();
        assert_eq!(read, written);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn inserts_append_across_instances() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = LocalVectorStore::new(dir.path());
            store.create_collection("policies", meta()).await.unwrap();
            store.insert("policies", &[chunk("a", "first", vec![1.0, 0.0])]).await.unwrap();
        }
        {
            let store = LocalVectorStore::new(dir.path());
            store.insert("policies", &[chunk("b", "second", vec![0.0, 1.0])]).await.unwrap();
        }

        let reopened = LocalVectorStore::new(dir.path());
        assert_eq!(reopened.count("policies").await.unwrap(), 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn delete_collection_removes_it_from_disk() {
        let dir = tempfile::tempdir().unwrap();

        let store = LocalVectorStore::new(dir.path());
        store.create_collection("policies", meta()).await.unwrap();
        store.insert("policies", &[chunk("a", "first", vec![1.0, 0.0])]).await.unwrap();
        store.delete_collection("policies").await.unwrap();

        assert!(store.collection_meta("policies").await.unwrap().is_none());
        let reopened = LocalVectorStore::new(dir.path());
        assert!(reopened.collection_meta("policies").await.unwrap().is_none());

        // Deleting again is a no-op, not an error.
        store.delete_collection("policies").await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn missing_collection_operations_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalVectorStore::new(dir.path());

        let err = store.search("absent", &[1.0, 0.0], 3).await.unwrap_err();
        assert!(err.to_string().contains("does not exist"));

        let err = store.count("absent").await.unwrap_err();
        assert!(err.to_string().contains("does not exist"));

        let err =
            store.insert("absent", &[chunk("a", "first", vec![1.0, 0.0])]).await.unwrap_err();
        assert!(err.to_string().contains("does not exist"));

        assert!(store.collection_meta("absent").await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn dimension_mismatch_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();

        let store = LocalVectorStore::new(dir.path());
        store.create_collection("policies", meta()).await.unwrap();
        let err =
            store.insert("policies", &[chunk("a", "first", vec![1.0, 0.0, 0.0])]).await.unwrap_err();
        assert!(err.to_string().contains("dimension"));

        let reopened = LocalVectorStore::new(dir.path());
        assert_eq!(reopened.count("policies").await.unwrap(), 0);
    }
}
