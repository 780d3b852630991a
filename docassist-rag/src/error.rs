//! Error types for the `docassist-rag` crate.

use thiserror::Error;

/// Errors that can occur while ingesting documents or answering questions.
///
/// Every failure kind the engine can surface is a distinct variant so that
/// callers can choose user-facing wording per kind (for example a cooldown
/// notice for [`RateLimited`](AssistantError::RateLimited)). The engine never
/// retries internally.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// Missing or invalid credential or store configuration. Fatal at
    /// construction; not recoverable without reconfiguration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A file could not be parsed into text. Recoverable: ingestion skips
    /// the file and reports it in the summary.
    #[error("failed to parse '{file}': {message}")]
    Parse {
        /// Name of the file that failed to parse.
        file: String,
        /// A description of the failure.
        message: String,
    },

    /// The embedding backend failed. Aborts the current ingest or answer
    /// call; previously indexed data is unaffected.
    #[error("embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The vector store backend is unreachable or rejected the operation.
    /// Aborts the current call without corrupting persisted state.
    #[error("vector store unavailable ({backend}): {message}")]
    StoreUnavailable {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// The generation backend signalled quota exhaustion or throttling.
    #[error("generation backend rate limited: {0}")]
    RateLimited(String),

    /// The generation backend rejected the credential.
    #[error("generation backend rejected credentials: {0}")]
    Auth(String),

    /// Any other generation backend failure.
    #[error("generation error: {0}")]
    Generation(String),
}

/// A convenience result type for engine operations.
pub type Result<T> = std::result::Result<T, AssistantError>;
