//! Configuration for the question-answering engine.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{AssistantError, Result};

/// Environment variable holding the language-model API key.
const API_KEY_VAR: &str = "GOOGLE_API_KEY";
/// Fallback environment variable for the API key.
const API_KEY_FALLBACK_VAR: &str = "GEMINI_API_KEY";
/// Environment variable selecting the remote Qdrant backend.
const QDRANT_URL_VAR: &str = "QDRANT_URL";
/// Environment variable naming the Qdrant collection.
const QDRANT_COLLECTION_VAR: &str = "QDRANT_COLLECTION";
/// Environment variable overriding the local index directory.
const INDEX_DIR_VAR: &str = "INDEX_DIR";

/// Default directory for the embedded local index.
const DEFAULT_INDEX_DIR: &str = "vector_store";
/// Default Qdrant collection name.
const DEFAULT_COLLECTION: &str = "documents";

/// Configuration parameters for chunking and retrieval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Maximum chunk size in characters.
    pub chunk_size: usize,
    /// Number of overlapping characters between consecutive chunks.
    pub chunk_overlap: usize,
    /// Number of top results to retrieve per query.
    pub top_k: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self { chunk_size: 1000, chunk_overlap: 200, top_k: 5 }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the maximum chunk size in characters.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the overlap between consecutive chunks in characters.
    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Set the number of top results to retrieve per query.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::Config`] if:
    /// - `chunk_size == 0`
    /// - `chunk_overlap >= chunk_size`
    /// - `top_k == 0`
    pub fn build(self) -> Result<RagConfig> {
        if self.config.chunk_size == 0 {
            return Err(AssistantError::Config("chunk_size must be greater than zero".to_string()));
        }
        if self.config.chunk_overlap >= self.config.chunk_size {
            return Err(AssistantError::Config(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                self.config.chunk_overlap, self.config.chunk_size
            )));
        }
        if self.config.top_k == 0 {
            return Err(AssistantError::Config("top_k must be greater than zero".to_string()));
        }
        Ok(self.config)
    }
}

/// Selects and parametrizes the vector store backend.
///
/// The backend is chosen here, at construction time, never by conditionals
/// in calling code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum StoreConfig {
    /// Embedded file-backed index under the given directory. Single-writer:
    /// concurrent multi-process writes are not supported.
    Local {
        /// Directory holding the index file; created if missing.
        path: PathBuf,
    },
    /// Managed Qdrant deployment reached over the network. Safe for
    /// concurrent multi-client access.
    Qdrant {
        /// Connection URL, e.g. `http://localhost:6334`.
        url: String,
        /// Name of the collection holding the records.
        collection: String,
    },
}

impl StoreConfig {
    /// Read the store selection from the environment.
    ///
    /// `QDRANT_URL` (with optional `QDRANT_COLLECTION`, default `documents`)
    /// selects the remote backend; otherwise the local backend is used with
    /// `INDEX_DIR` (default `vector_store`).
    pub fn from_env() -> Self {
        match std::env::var(QDRANT_URL_VAR) {
            Ok(url) if !url.is_empty() => StoreConfig::Qdrant {
                url,
                collection: std::env::var(QDRANT_COLLECTION_VAR)
                    .unwrap_or_else(|_| DEFAULT_COLLECTION.to_string()),
            },
            _ => StoreConfig::Local {
                path: std::env::var(INDEX_DIR_VAR)
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(DEFAULT_INDEX_DIR)),
            },
        }
    }
}

/// Read the language-model API key from `GOOGLE_API_KEY`, falling back to
/// `GEMINI_API_KEY`.
///
/// # Errors
///
/// Returns [`AssistantError::Config`] if neither variable is set.
pub fn api_key_from_env() -> Result<String> {
    std::env::var(API_KEY_VAR)
        .or_else(|_| std::env::var(API_KEY_FALLBACK_VAR))
        .map_err(|_| {
            AssistantError::Config(format!(
                "{API_KEY_VAR} or {API_KEY_FALLBACK_VAR} must be set"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_engine_defaults() {
        let config = RagConfig::default();
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.chunk_overlap, 200);
        assert_eq!(config.top_k, 5);
    }

    #[test]
    fn builder_rejects_overlap_not_below_size() {
        let err = RagConfig::builder().chunk_size(100).chunk_overlap(100).build();
        assert!(matches!(err, Err(AssistantError::Config(_))));
    }

    #[test]
    fn builder_rejects_zero_top_k() {
        let err = RagConfig::builder().top_k(0).build();
        assert!(matches!(err, Err(AssistantError::Config(_))));
    }

    #[test]
    fn builder_accepts_valid_parameters() {
        let config = RagConfig::builder().chunk_size(512).chunk_overlap(64).top_k(3).build();
        assert!(config.is_ok());
    }
}
