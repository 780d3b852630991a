//! In-memory vector store using cosine similarity.
//!
//! [`MemoryStore`] keeps chunks in an insertion-ordered `Vec` behind a
//! `tokio::sync::RwLock`. It persists nothing and exists for tests, demos,
//! and small transient workloads.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{Chunk, SearchResult};
use crate::error::Result;
use crate::vectorstore::{VectorStore, cosine_similarity};

/// An in-memory, insertion-ordered vector store.
///
/// Search scores every stored chunk against the query embedding and sorts
/// descending; the sort is stable, so equal scores keep insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    chunks: RwLock<Vec<Chunk>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorStore for MemoryStore {
    async fn add(&self, chunks: &[Chunk]) -> Result<()> {
        let mut store = self.chunks.write().await;
        store.extend_from_slice(chunks);
        Ok(())
    }

    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchResult>> {
        let store = self.chunks.read().await;

        let mut scored: Vec<SearchResult> = store
            .iter()
            .map(|chunk| SearchResult {
                score: cosine_similarity(&chunk.embedding, embedding),
                chunk: chunk.clone(),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.chunks.read().await.len() as u64)
    }

    async fn clear(&self) -> Result<u64> {
        let mut store = self.chunks.write().await;
        let removed = store.len() as u64;
        store.clear();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn chunk(id: &str, embedding: Vec<f32>) -> Chunk {
        Chunk {
            id: id.to_string(),
            text: format!("text for {id}"),
            embedding,
            metadata: HashMap::new(),
            document_id: "doc".to_string(),
        }
    }

    #[tokio::test]
    async fn empty_store_returns_empty_results() {
        let store = MemoryStore::new();
        let results = store.search(&[1.0, 0.0], 5).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn equal_scores_keep_insertion_order() {
        let store = MemoryStore::new();
        // Identical embeddings score identically against any query.
        store
            .add(&[
                chunk("first", vec![1.0, 0.0]),
                chunk("second", vec![1.0, 0.0]),
                chunk("third", vec![1.0, 0.0]),
            ])
            .await
            .unwrap();

        let results = store.search(&[1.0, 0.0], 3).await.unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.chunk.id.as_str()).collect();
        assert_eq!(ids, ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn duplicate_adds_are_not_deduplicated() {
        let store = MemoryStore::new();
        let c = chunk("dup", vec![1.0, 0.0]);
        store.add(&[c.clone()]).await.unwrap();
        store.add(&[c]).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn clear_reports_the_number_removed() {
        let store = MemoryStore::new();
        store.add(&[chunk("a", vec![1.0]), chunk("b", vec![0.5])]).await.unwrap();
        assert_eq!(store.clear().await.unwrap(), 2);
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
