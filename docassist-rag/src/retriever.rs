//! Retrieval: query embedding plus vector store search.

use std::sync::Arc;

use tracing::{debug, error};

use crate::document::SearchResult;
use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::vectorstore::VectorStore;

/// Retrieves the chunks most relevant to a query.
///
/// Embeds the query with the same provider used at indexing time and
/// delegates to the store's similarity search. An empty store yields an
/// empty result; turning that into a user-facing "knowledge base empty"
/// condition is the orchestrator's job, not the retriever's.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    top_k: usize,
}

impl Retriever {
    /// Create a retriever with a default result count.
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        top_k: usize,
    ) -> Self {
        Self { embedder, store, top_k }
    }

    /// Retrieve up to the configured `top_k` results for a query.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<SearchResult>> {
        self.retrieve_top(query, self.top_k).await
    }

    /// Retrieve up to `top_k` results, overriding the configured default.
    pub async fn retrieve_top(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult>> {
        let query_embedding = self.embedder.embed(query).await.inspect_err(|e| {
            error!(error = %e, "query embedding failed");
        })?;

        let results = self.store.search(&query_embedding, top_k).await.inspect_err(|e| {
            error!(error = %e, "vector store search failed");
        })?;

        debug!(result_count = results.len(), top_k, "retrieval completed");
        Ok(results)
    }
}
