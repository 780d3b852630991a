//! Document chunking.
//!
//! This module provides the [`Chunker`] trait and [`RecursiveChunker`], which
//! splits document text hierarchically by paragraphs, lines, then words,
//! falling back to a hard character cut for unsplittable runs.

use crate::document::{Chunk, Document};

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s with text and metadata but no
/// embeddings. Embeddings are attached later during ingestion.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// Returns an empty `Vec` if the document has empty text.
    /// Each returned chunk has an empty embedding vector.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Splits text hierarchically: paragraphs → lines → words → characters.
///
/// Segments are merged greedily up to `chunk_size` characters. Each chunk
/// after the first begins with the last `chunk_overlap` characters of the
/// previous chunk, so context is preserved across chunk boundaries. A run
/// with no usable separator is cut at character boundaries, so no emitted
/// chunk ever exceeds `chunk_size` characters.
///
/// All sizes are measured in characters, not bytes; multi-byte text is
/// never split inside a code point.
///
/// # Example
///
/// ```rust,ignore
/// use docassist_rag::RecursiveChunker;
///
/// let chunker = RecursiveChunker::new(1000, 200);
/// let chunks = chunker.chunk(&document);
/// ```
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

/// Separator ladder, largest first. The final fallback is a character cut.
const SEPARATORS: [&str; 3] = ["\n\n", "\n", " "];

impl RecursiveChunker {
    /// Create a new `RecursiveChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` — maximum number of characters per chunk
    /// * `chunk_overlap` — number of overlapping characters between consecutive chunks
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap }
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        if document.text.is_empty() {
            return Vec::new();
        }

        let raw_chunks =
            split_and_merge(&document.text, self.chunk_size, self.chunk_overlap, &SEPARATORS);

        raw_chunks
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let mut metadata = document.metadata.clone();
                metadata.insert("chunk_index".to_string(), i.to_string());
                Chunk {
                    id: format!("{}_{i}", document.id),
                    text,
                    embedding: Vec::new(),
                    metadata,
                    document_id: document.id.clone(),
                }
            })
            .collect()
    }
}

/// Number of characters in a string.
fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// The last `n` characters of a string (the whole string if shorter).
fn tail_chars(text: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    let total = char_len(text);
    if total <= n {
        return text;
    }
    let start = text
        .char_indices()
        .nth(total - n)
        .map(|(i, _)| i)
        .unwrap_or(0);
    &text[start..]
}

/// Split text at a separator while keeping the separator attached to the
/// preceding segment, so joining the segments reconstructs the input.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let mut result = Vec::new();
    let mut start = 0;

    while let Some(pos) = text[start..].find(separator) {
        let end = start + pos + separator.len();
        result.push(&text[start..end]);
        start = end;
    }

    if start < text.len() {
        result.push(&text[start..]);
    }

    result
}

/// Hard character-boundary splitting with a sliding overlap window.
///
/// The step between chunk starts is `chunk_size - chunk_overlap`, so
/// consecutive chunks overlap by exactly `chunk_overlap` characters.
fn split_by_size(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let total = boundaries.len() - 1;
    let step = chunk_size.saturating_sub(chunk_overlap);

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < total {
        let end = (start + chunk_size).min(total);
        chunks.push(text[boundaries[start]..boundaries[end]].to_string());
        if step == 0 || end == total {
            break;
        }
        start += step;
    }

    chunks
}

/// Split text by a separator, then merge segments into chunks that respect
/// `chunk_size`, carrying `chunk_overlap` trailing characters of each
/// emitted chunk into the next. A merged run that still exceeds
/// `chunk_size` is split further with the next-level separator.
fn split_and_merge(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
    separators: &[&str],
) -> Vec<String> {
    if char_len(text) <= chunk_size || separators.is_empty() {
        return split_by_size(text, chunk_size, chunk_overlap);
    }

    let separator = separators[0];
    let remaining_separators = &separators[1..];

    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();

    for segment in split_keeping_separator(text, separator) {
        if !current.is_empty() && char_len(&current) + char_len(segment) > chunk_size {
            emit(
                &mut chunks,
                std::mem::take(&mut current),
                chunk_size,
                chunk_overlap,
                remaining_separators,
            );
            if let Some(last) = chunks.last() {
                current = tail_chars(last, chunk_overlap).to_string();
            }
        }
        current.push_str(segment);
    }

    if !current.is_empty() {
        emit(&mut chunks, current, chunk_size, chunk_overlap, remaining_separators);
    }

    chunks
}

/// Push a merged run onto `chunks`, recursing into the next separator level
/// when the run exceeds `chunk_size`.
fn emit(
    chunks: &mut Vec<String>,
    piece: String,
    chunk_size: usize,
    chunk_overlap: usize,
    remaining_separators: &[&str],
) {
    if char_len(&piece) > chunk_size {
        chunks.extend(split_and_merge(&piece, chunk_size, chunk_overlap, remaining_separators));
    } else {
        chunks.push(piece);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn doc(text: &str) -> Document {
        Document {
            id: "doc_1".to_string(),
            text: text.to_string(),
            metadata: HashMap::from([("source".to_string(), "notes.txt".to_string())]),
        }
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunker = RecursiveChunker::new(1000, 200);
        let chunks = chunker.chunk(&doc("a short note"));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "a short note");
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        let chunker = RecursiveChunker::new(1000, 200);
        assert!(chunker.chunk(&doc("")).is_empty());
    }

    #[test]
    fn no_chunk_exceeds_chunk_size() {
        let chunker = RecursiveChunker::new(100, 20);
        let paragraphs: Vec<String> =
            (0..30).map(|i| format!("paragraph number {i} with a little filler text")).collect();
        let text = paragraphs.join("\n\n");
        for chunk in chunker.chunk(&doc(&text)) {
            assert!(chunk.text.chars().count() <= 100, "oversized chunk: {}", chunk.text.len());
        }
    }

    #[test]
    fn unsplittable_run_is_hard_cut_with_exact_overlap() {
        let chunker = RecursiveChunker::new(1000, 200);
        let text = "a".repeat(3000);
        let chunks = chunker.chunk(&doc(&text));

        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[0].text.chars().count(), 1000);
        assert_eq!(chunks[1].text.chars().count(), 1000);
        assert_eq!(chunks[2].text.chars().count(), 1000);
        assert_eq!(chunks[3].text.chars().count(), 600);

        for window in chunks.windows(2) {
            let tail = tail_chars(&window[0].text, 200);
            assert!(window[1].text.starts_with(tail));
        }
    }

    #[test]
    fn three_thousand_char_prose_yields_four_chunks() {
        // 600 repetitions of a five-character word, 3000 characters total,
        // with defaults 1000/200: expect 4 chunks, each within the limit.
        let chunker = RecursiveChunker::new(1000, 200);
        let text = "word ".repeat(600);
        let chunks = chunker.chunk(&doc(&text));

        assert_eq!(chunks.len(), 4);
        for chunk in &chunks {
            assert!(chunk.text.chars().count() <= 1000);
        }
    }

    #[test]
    fn consecutive_chunks_share_the_overlap_tail() {
        let chunker = RecursiveChunker::new(200, 50);
        let text = "lorem ipsum dolor sit amet ".repeat(40);
        let chunks = chunker.chunk(&doc(&text));

        assert!(chunks.len() > 1);
        for window in chunks.windows(2) {
            let tail = tail_chars(&window[0].text, 50);
            assert!(
                window[1].text.starts_with(tail),
                "chunk did not begin with the previous chunk's tail"
            );
        }
    }

    #[test]
    fn metadata_and_ids_propagate_to_every_chunk() {
        let chunker = RecursiveChunker::new(100, 20);
        let text = "sentence one here\n\nsentence two here\n\n".repeat(10);
        let chunks = chunker.chunk(&doc(&text));

        assert!(chunks.len() > 1);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.id, format!("doc_1_{i}"));
            assert_eq!(chunk.document_id, "doc_1");
            assert_eq!(chunk.metadata.get("source").map(String::as_str), Some("notes.txt"));
            assert_eq!(chunk.metadata.get("chunk_index").map(String::as_str), Some(i.to_string().as_str()));
        }
    }

    #[test]
    fn multibyte_text_never_panics_and_respects_the_limit() {
        let chunker = RecursiveChunker::new(100, 20);
        let text = "日本語のテキストです。".repeat(50);
        for chunk in chunker.chunk(&doc(&text)) {
            assert!(chunk.text.chars().count() <= 100);
        }
    }
}
