//! The question-answering engine façade.
//!
//! [`DocAssistant`] coordinates ingestion (parse → chunk → embed → store)
//! and answering (retrieve → generate), and exposes the maintenance
//! operations (count, wipe). Construct one per configuration via
//! [`DocAssistant::connect`] and inject it into request handlers; losing
//! the credential or the store means constructing a new one.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::chunking::{Chunker, RecursiveChunker};
use crate::config::{RagConfig, StoreConfig};
use crate::document::{Answer, Chunk, IngestFailure, IngestSummary};
use crate::embedding::EmbeddingProvider;
use crate::error::{AssistantError, Result};
use crate::gemini::{GeminiEmbedder, GeminiGenerator};
use crate::generation::{Generator, TextGenerator};
use crate::loader::FileUpload;
use crate::local::LocalIndexStore;
use crate::qdrant::QdrantStore;
use crate::retriever::Retriever;
use crate::vectorstore::VectorStore;

/// Fixed reply when a question arrives before any document was indexed.
/// Returned without invoking the generation backend.
pub const KNOWLEDGE_BASE_EMPTY_MESSAGE: &str =
    "The knowledge base is empty. Upload and process documents before asking questions.";

/// The engine façade: ingestion, answering, and maintenance over one
/// vector store.
///
/// # Example
///
/// ```rust,ignore
/// use docassist_rag::{DocAssistant, RagConfig, StoreConfig};
///
/// let assistant = DocAssistant::connect(
///     api_key,
///     StoreConfig::from_env(),
///     RagConfig::default(),
/// ).await?;
///
/// assistant.ingest(vec![upload]).await?;
/// let answer = assistant.answer("What does the report conclude?").await?;
/// ```
pub struct DocAssistant {
    chunker: Arc<dyn Chunker>,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    retriever: Retriever,
    generator: Generator,
}

impl DocAssistant {
    /// Create a new [`DocAssistantBuilder`] for injecting custom components.
    pub fn builder() -> DocAssistantBuilder {
        DocAssistantBuilder::default()
    }

    /// Construct a ready assistant: Gemini embedder and generator wired to
    /// the configured vector store backend.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::Config`] if the API key is empty, the
    /// configuration is inconsistent, or the store cannot be reached.
    pub async fn connect(
        api_key: impl Into<String>,
        store_config: StoreConfig,
        config: RagConfig,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(AssistantError::Config("API key is required".to_string()));
        }

        let embedder = Arc::new(GeminiEmbedder::new(api_key.as_str())?);
        let generator = Arc::new(GeminiGenerator::new(api_key.as_str())?);

        let store = open_store(&store_config, embedder.dimensions())
            .await
            .map_err(|e| AssistantError::Config(format!("vector store is not usable: {e}")))?;

        let assistant = Self::builder()
            .config(config)
            .embedding_provider(embedder)
            .vector_store(store)
            .text_generator(generator)
            .build()?;

        // Readiness probe: an unreachable store is a construction failure,
        // not a deferred runtime surprise.
        assistant
            .store
            .count()
            .await
            .map_err(|e| AssistantError::Config(format!("vector store is not reachable: {e}")))?;

        Ok(assistant)
    }

    /// Parse, chunk, embed, and index the given files.
    ///
    /// Files are processed independently: a file that fails to parse is
    /// skipped and reported in [`IngestSummary::failures`] while the rest
    /// proceed. Files that parse but yield no text count as processed with
    /// zero chunks.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::Embedding`] or
    /// [`AssistantError::StoreUnavailable`] and aborts the remaining files;
    /// already-indexed chunks from earlier files stay indexed.
    pub async fn ingest(&self, files: Vec<FileUpload>) -> Result<IngestSummary> {
        let mut summary = IngestSummary::default();

        for file in files {
            let file_name = file.name.clone();
            let document = match file.into_document() {
                Ok(document) => document,
                Err(e) => {
                    warn!(file = %file_name, error = %e, "skipping unparseable file");
                    let message = match &e {
                        AssistantError::Parse { message, .. } => message.clone(),
                        other => other.to_string(),
                    };
                    summary.failures.push(IngestFailure { file: file_name, message });
                    continue;
                }
            };

            let mut chunks = self.chunker.chunk(&document);
            if chunks.is_empty() {
                info!(file = %file_name, chunk_count = 0, "ingested file (no text)");
                summary.files_processed += 1;
                continue;
            }

            let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
            let embeddings = self.embedder.embed_batch(&texts).await?;
            for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
                chunk.embedding = embedding;
            }

            self.store.add(&chunks).await?;

            info!(file = %file_name, chunk_count = chunks.len(), "ingested file");
            summary.files_processed += 1;
            summary.chunks_added += chunks.len();
        }

        Ok(summary)
    }

    /// Answer a question from the indexed documents.
    ///
    /// On an empty store this returns the fixed
    /// [`KNOWLEDGE_BASE_EMPTY_MESSAGE`] without calling the generation
    /// backend. When the store has records but retrieval finds no matches,
    /// the generator is still invoked with an empty context and the prompt
    /// directs the model to say it cannot find the information.
    pub async fn answer(&self, question: &str) -> Result<Answer> {
        if self.store.count().await? == 0 {
            debug!("knowledge base is empty; skipping generation");
            return Ok(Answer {
                text: KNOWLEDGE_BASE_EMPTY_MESSAGE.to_string(),
                sources: Vec::new(),
            });
        }

        let results = self.retriever.retrieve(question).await?;
        let sources: Vec<Chunk> = results.into_iter().map(|r| r.chunk).collect();

        let text = self.generator.generate(question, &sources).await?;

        info!(source_count = sources.len(), "answered question");
        Ok(Answer { text, sources })
    }

    /// Total number of indexed chunks.
    pub async fn document_count(&self) -> Result<u64> {
        self.store.count().await
    }

    /// Delete every indexed chunk, returning how many were removed.
    pub async fn wipe(&self) -> Result<u64> {
        let removed = self.store.clear().await?;
        info!(removed, "wiped knowledge base");
        Ok(removed)
    }
}

/// Open the vector store backend selected by the configuration.
async fn open_store(
    config: &StoreConfig,
    dimensions: usize,
) -> Result<Arc<dyn VectorStore>> {
    match config {
        StoreConfig::Local { path } => Ok(Arc::new(LocalIndexStore::open(path).await?)),
        StoreConfig::Qdrant { url, collection } => {
            Ok(Arc::new(QdrantStore::connect(url, collection, dimensions).await?))
        }
    }
}

/// Builder for constructing a [`DocAssistant`] from injected components.
///
/// `embedding_provider`, `vector_store`, and `text_generator` are required;
/// `config` defaults to [`RagConfig::default`] and the chunker defaults to a
/// [`RecursiveChunker`] sized from the config.
#[derive(Default)]
pub struct DocAssistantBuilder {
    config: Option<RagConfig>,
    chunker: Option<Arc<dyn Chunker>>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    text_generator: Option<Arc<dyn TextGenerator>>,
}

impl DocAssistantBuilder {
    /// Set the chunking/retrieval configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a custom chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Set the generation model backend.
    pub fn text_generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.text_generator = Some(generator);
        self
    }

    /// Build the [`DocAssistant`], validating that required components are set.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::Config`] if a required component is missing.
    pub fn build(self) -> Result<DocAssistant> {
        let config = self.config.unwrap_or_default();
        let embedder = self.embedding_provider.ok_or_else(|| {
            AssistantError::Config("embedding_provider is required".to_string())
        })?;
        let store = self
            .vector_store
            .ok_or_else(|| AssistantError::Config("vector_store is required".to_string()))?;
        let backend = self
            .text_generator
            .ok_or_else(|| AssistantError::Config("text_generator is required".to_string()))?;
        let chunker = self
            .chunker
            .unwrap_or_else(|| Arc::new(RecursiveChunker::new(config.chunk_size, config.chunk_overlap)));

        let retriever = Retriever::new(Arc::clone(&embedder), Arc::clone(&store), config.top_k);

        Ok(DocAssistant {
            chunker,
            embedder,
            store,
            retriever,
            generator: Generator::new(backend),
        })
    }
}
