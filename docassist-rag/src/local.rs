//! Embedded file-backed vector index.
//!
//! Provides [`LocalIndexStore`], a [`VectorStore`] persisted to a sqlite
//! file under a caller-chosen directory. Rows are insertion-ordered via a
//! monotonically increasing `seq` column; embeddings are stored as
//! little-endian `f32` blobs and similarity is computed in-process.
//!
//! The file is single-writer: concurrent writes from multiple processes are
//! not supported. Use the Qdrant backend for multi-client deployments.

use std::path::Path;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::document::{Chunk, SearchResult};
use crate::error::{AssistantError, Result};
use crate::vectorstore::{VectorStore, cosine_similarity};

/// File name of the index inside the configured directory.
const INDEX_FILE: &str = "chunks.sqlite3";

const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS chunks (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL,
    text TEXT NOT NULL,
    embedding BLOB NOT NULL,
    metadata TEXT NOT NULL,
    document_id TEXT NOT NULL
)";

/// A [`VectorStore`] backed by a sqlite file.
pub struct LocalIndexStore {
    pool: SqlitePool,
}

impl LocalIndexStore {
    /// Open (or create) the index under the given directory.
    ///
    /// The directory and the index file are created if missing.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::StoreUnavailable`] if the directory cannot
    /// be created or the database cannot be opened.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|e| AssistantError::StoreUnavailable {
            backend: "local".to_string(),
            message: format!("failed to create index directory '{}': {e}", dir.display()),
        })?;

        let options = SqliteConnectOptions::new()
            .filename(dir.join(INDEX_FILE))
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(Self::map_err)?;

        sqlx::query(SCHEMA_SQL).execute(&pool).await.map_err(Self::map_err)?;

        debug!(dir = %dir.display(), "opened local index");
        Ok(Self { pool })
    }

    fn map_err(e: sqlx::Error) -> AssistantError {
        AssistantError::StoreUnavailable { backend: "local".to_string(), message: e.to_string() }
    }
}

/// Encode an embedding as a little-endian `f32` byte blob.
fn encode_embedding(vector: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(std::mem::size_of_val(vector));
    for &value in vector {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Decode a little-endian `f32` byte blob back into an embedding.
fn decode_embedding(blob: &[u8]) -> Result<Vec<f32>> {
    if blob.len() % 4 != 0 {
        return Err(AssistantError::StoreUnavailable {
            backend: "local".to_string(),
            message: format!("invalid embedding blob length: {}", blob.len()),
        });
    }
    Ok(blob
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

#[async_trait]
impl VectorStore for LocalIndexStore {
    async fn add(&self, chunks: &[Chunk]) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        // One transaction per call: either every chunk lands with its
        // embedding, or none do.
        let mut tx = self.pool.begin().await.map_err(Self::map_err)?;

        for chunk in chunks {
            let metadata_json =
                serde_json::to_string(&chunk.metadata).unwrap_or_else(|_| "{}".to_string());

            sqlx::query(
                "INSERT INTO chunks (id, text, embedding, metadata, document_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(&chunk.id)
            .bind(&chunk.text)
            .bind(encode_embedding(&chunk.embedding))
            .bind(&metadata_json)
            .bind(&chunk.document_id)
            .execute(&mut *tx)
            .await
            .map_err(Self::map_err)?;
        }

        tx.commit().await.map_err(Self::map_err)?;

        debug!(count = chunks.len(), "appended chunks to local index");
        Ok(())
    }

    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchResult>> {
        let rows = sqlx::query(
            "SELECT id, text, embedding, metadata, document_id
             FROM chunks ORDER BY seq ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Self::map_err)?;

        let mut scored = Vec::with_capacity(rows.len());
        for row in &rows {
            let blob: Vec<u8> = row.get("embedding");
            let stored = decode_embedding(&blob)?;
            let metadata_json: String = row.get("metadata");
            let metadata = serde_json::from_str(&metadata_json).unwrap_or_default();

            scored.push(SearchResult {
                score: cosine_similarity(&stored, embedding),
                chunk: Chunk {
                    id: row.get("id"),
                    text: row.get("text"),
                    embedding: stored,
                    metadata,
                    document_id: row.get("document_id"),
                },
            });
        }

        // Stable sort: rows arrive in seq order, so ties keep insertion order.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }

    async fn count(&self) -> Result<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM chunks")
            .fetch_one(&self.pool)
            .await
            .map_err(Self::map_err)?;
        let n: i64 = row.get("n");
        Ok(n as u64)
    }

    async fn clear(&self) -> Result<u64> {
        let result =
            sqlx::query("DELETE FROM chunks").execute(&self.pool).await.map_err(Self::map_err)?;
        debug!(removed = result.rows_affected(), "cleared local index");
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedding_blob_round_trips() {
        let vector = vec![0.25f32, -1.5, 3.0, f32::MIN_POSITIVE];
        let decoded = decode_embedding(&encode_embedding(&vector)).unwrap();
        assert_eq!(decoded, vector);
    }

    #[test]
    fn truncated_blob_is_rejected() {
        let err = decode_embedding(&[0u8, 1, 2]);
        assert!(matches!(err, Err(AssistantError::StoreUnavailable { .. })));
    }
}
