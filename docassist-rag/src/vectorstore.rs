//! Vector store trait for persisting and searching embedded chunks.

use async_trait::async_trait;

use crate::document::{Chunk, SearchResult};
use crate::error::Result;

/// A storage backend for embedded chunks with similarity search.
///
/// Each store instance owns exactly one index; which backend backs it (and
/// where it lives) is decided by [`StoreConfig`](crate::StoreConfig) at
/// construction time. Stores are append-only and perform no deduplication:
/// adding the same content twice yields two records.
///
/// # Example
///
/// ```rust,ignore
/// use docassist_rag::{MemoryStore, VectorStore};
///
/// let store = MemoryStore::new();
/// store.add(&chunks).await?;
/// let results = store.search(&query_embedding, 5).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Append chunks to the store. Chunks must have embeddings set; each
    /// record is written atomically (text and embedding together).
    async fn add(&self, chunks: &[Chunk]) -> Result<()>;

    /// Return the `top_k` records most similar to the given embedding,
    /// ordered by descending similarity with ties broken by insertion
    /// order. An empty store yields an empty result, not an error.
    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchResult>>;

    /// Total number of records currently stored.
    async fn count(&self) -> Result<u64>;

    /// Delete all records, returning how many were removed.
    async fn clear(&self) -> Result<u64>;
}

/// Cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude or the lengths differ.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
