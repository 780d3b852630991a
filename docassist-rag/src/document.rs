//! Data types for documents, chunks, retrieval results, and answers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A source document containing text content and metadata.
///
/// Documents are transient: the loader produces one per uploaded file and
/// the chunker consumes it. Only the derived chunks are persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Unique identifier for the document. Minted fresh per upload, so
    /// re-ingesting the same file never overwrites earlier records.
    pub id: String,
    /// The text content of the document.
    pub text: String,
    /// Key-value metadata associated with the document. Always carries
    /// `source` (the original file name).
    pub metadata: HashMap<String, String>,
}

/// A segment of a [`Document`] with its vector embedding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique identifier for the chunk (`{document_id}_{chunk_index}`).
    pub id: String,
    /// The text content of the chunk.
    pub text: String,
    /// The vector embedding for this chunk's text. Empty until the
    /// embedding provider attaches it; immutable afterwards.
    pub embedding: Vec<f32>,
    /// Key-value metadata inherited from the parent document plus
    /// chunk-specific fields.
    pub metadata: HashMap<String, String>,
    /// The ID of the parent [`Document`].
    pub document_id: String,
}

/// A retrieved [`Chunk`] paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}

/// A generated answer together with the chunks that grounded it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// The generated answer text.
    pub text: String,
    /// The retrieved chunks the answer was conditioned on, in retrieval
    /// order. Empty when the knowledge base held no documents.
    pub sources: Vec<Chunk>,
}

/// Outcome of an [`ingest`](crate::DocAssistant::ingest) call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestSummary {
    /// Number of files whose text was extracted and indexed.
    pub files_processed: usize,
    /// Total number of chunks written to the vector store.
    pub chunks_added: usize,
    /// Files that failed to parse and were skipped.
    pub failures: Vec<IngestFailure>,
}

/// A file skipped during ingestion, with the reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestFailure {
    /// Name of the file that was skipped.
    pub file: String,
    /// Why parsing failed.
    pub message: String,
}
