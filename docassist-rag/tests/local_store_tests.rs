//! On-disk tests for the embedded sqlite-backed index.

use std::collections::HashMap;

use docassist_rag::{Chunk, LocalIndexStore, VectorStore};

fn chunk(id: &str, text: &str, embedding: Vec<f32>) -> Chunk {
    Chunk {
        id: id.to_string(),
        text: text.to_string(),
        embedding,
        metadata: HashMap::from([("source".to_string(), "file.txt".to_string())]),
        document_id: "doc".to_string(),
    }
}

#[tokio::test]
async fn empty_index_searches_to_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalIndexStore::open(dir.path()).await.unwrap();

    assert_eq!(store.count().await.unwrap(), 0);
    assert!(store.search(&[1.0, 0.0], 5).await.unwrap().is_empty());
}

#[tokio::test]
async fn search_orders_by_descending_similarity() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalIndexStore::open(dir.path()).await.unwrap();

    store
        .add(&[
            chunk("far", "unrelated", vec![0.0, 1.0]),
            chunk("near", "very relevant", vec![1.0, 0.0]),
            chunk("middle", "somewhat relevant", vec![0.7, 0.7]),
        ])
        .await
        .unwrap();

    let results = store.search(&[1.0, 0.0], 3).await.unwrap();
    let ids: Vec<&str> = results.iter().map(|r| r.chunk.id.as_str()).collect();
    assert_eq!(ids, ["near", "middle", "far"]);
    for window in results.windows(2) {
        assert!(window[0].score >= window[1].score);
    }
}

#[tokio::test]
async fn search_respects_top_k() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalIndexStore::open(dir.path()).await.unwrap();

    let chunks: Vec<Chunk> =
        (0..10).map(|i| chunk(&format!("c{i}"), "text", vec![1.0, i as f32])).collect();
    store.add(&chunks).await.unwrap();

    assert_eq!(store.search(&[1.0, 0.0], 4).await.unwrap().len(), 4);
}

#[tokio::test]
async fn ties_break_by_insertion_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalIndexStore::open(dir.path()).await.unwrap();

    store.add(&[chunk("first", "a", vec![1.0, 0.0])]).await.unwrap();
    store.add(&[chunk("second", "b", vec![1.0, 0.0])]).await.unwrap();
    store.add(&[chunk("third", "c", vec![1.0, 0.0])]).await.unwrap();

    let results = store.search(&[1.0, 0.0], 3).await.unwrap();
    let ids: Vec<&str> = results.iter().map(|r| r.chunk.id.as_str()).collect();
    assert_eq!(ids, ["first", "second", "third"]);
}

#[tokio::test]
async fn records_survive_reopening_the_index() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = LocalIndexStore::open(dir.path()).await.unwrap();
        store
            .add(&[chunk("persisted", "kept across restarts", vec![0.5, 0.5])])
            .await
            .unwrap();
    }

    let reopened = LocalIndexStore::open(dir.path()).await.unwrap();
    assert_eq!(reopened.count().await.unwrap(), 1);

    let results = reopened.search(&[0.5, 0.5], 1).await.unwrap();
    assert_eq!(results[0].chunk.text, "kept across restarts");
    assert_eq!(
        results[0].chunk.metadata.get("source").map(String::as_str),
        Some("file.txt")
    );
}

#[tokio::test]
async fn duplicate_content_is_stored_twice() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalIndexStore::open(dir.path()).await.unwrap();

    let c = chunk("same", "same text", vec![1.0]);
    store.add(&[c.clone()]).await.unwrap();
    store.add(&[c]).await.unwrap();

    assert_eq!(store.count().await.unwrap(), 2);
}

#[tokio::test]
async fn clear_reports_removed_rows_and_leaves_an_empty_index() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalIndexStore::open(dir.path()).await.unwrap();

    store
        .add(&[chunk("a", "x", vec![1.0]), chunk("b", "y", vec![0.0])])
        .await
        .unwrap();

    assert_eq!(store.clear().await.unwrap(), 2);
    assert_eq!(store.count().await.unwrap(), 0);
    assert!(store.search(&[1.0], 5).await.unwrap().is_empty());
}
