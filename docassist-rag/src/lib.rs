//! # docassist-rag
//!
//! Retrieval-augmented question answering over uploaded documents.
//!
//! Callers upload PDF/TXT bytes; the engine chunks, embeds, and indexes
//! them into a vector store, then answers natural-language questions by
//! retrieving relevant chunks and conditioning a hosted language model on
//! them.
//!
//! ## Overview
//!
//! - [`DocAssistant`]: the façade (ingest, answer, count, wipe)
//! - [`RecursiveChunker`]: hierarchical text splitting with overlap
//! - [`EmbeddingProvider`] / [`GeminiEmbedder`]: text to fixed-dimension vectors
//! - [`VectorStore`] with three backends: [`LocalIndexStore`] (embedded,
//!   file-backed), [`QdrantStore`] (managed, network-backed), and
//!   [`MemoryStore`] (transient, for tests and demos)
//! - [`Retriever`]: query embedding plus top-k similarity search
//! - [`Generator`] / [`GeminiGenerator`]: grounded prompt composition and
//!   one-shot generation
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use docassist_rag::{DocAssistant, FileUpload, RagConfig, StoreConfig, api_key_from_env};
//!
//! let assistant = DocAssistant::connect(
//!     api_key_from_env()?,
//!     StoreConfig::from_env(),
//!     RagConfig::default(),
//! ).await?;
//!
//! let summary = assistant.ingest(vec![FileUpload::from_path("report.pdf")?]).await?;
//! println!("indexed {} chunks", summary.chunks_added);
//!
//! let answer = assistant.answer("What does the report conclude?").await?;
//! println!("{}", answer.text);
//! ```
//!
//! The engine returns complete answers synchronously and never retries
//! internally; every failure surfaces as a distinct
//! [`AssistantError`] variant.

pub mod assistant;
pub mod auth;
pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod gemini;
pub mod generation;
pub mod loader;
pub mod local;
pub mod memory;
pub mod qdrant;
pub mod retriever;
pub mod vectorstore;

pub use assistant::{DocAssistant, DocAssistantBuilder, KNOWLEDGE_BASE_EMPTY_MESSAGE};
pub use auth::{AdminCredentials, hash_password};
pub use chunking::{Chunker, RecursiveChunker};
pub use config::{RagConfig, RagConfigBuilder, StoreConfig, api_key_from_env};
pub use document::{Answer, Chunk, Document, IngestFailure, IngestSummary, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{AssistantError, Result};
pub use gemini::{GeminiEmbedder, GeminiGenerator};
pub use generation::{Generator, TextGenerator};
pub use loader::{FileType, FileUpload, extract_text};
pub use local::LocalIndexStore;
pub use memory::MemoryStore;
pub use qdrant::QdrantStore;
pub use retriever::Retriever;
pub use vectorstore::VectorStore;
