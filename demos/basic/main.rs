//! # Basic Demo
//!
//! Exercises the full engine offline: ingest, answer, count, wipe.
//!
//! Uses `MemoryStore`, a deterministic mock embedder, and an offline
//! generator, so it runs with **zero API keys**.
//!
//! Run: `cargo run --example basic`

use std::sync::Arc;

use docassist_rag::{
    DocAssistant, EmbeddingProvider, FileType, FileUpload, MemoryStore, RagConfig, TextGenerator,
};

// ---------------------------------------------------------------------------
// MockEmbedder — deterministic hash-based embeddings for demos/tests
// ---------------------------------------------------------------------------

struct MockEmbedder {
    dimensions: usize,
}

impl MockEmbedder {
    fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, text: &str) -> docassist_rag::Result<Vec<f32>> {
        // Deterministic embedding: hash the text bytes, then generate a
        // normalised vector whose direction depends on the content.
        let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        let mut emb = vec![0.0f32; self.dimensions];
        for (i, v) in emb.iter_mut().enumerate() {
            *v = ((hash.wrapping_add(i as u64)) as f32).sin();
        }
        // L2-normalise so cosine similarity is just the dot product.
        let norm: f32 = emb.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            emb.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(emb)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

// ---------------------------------------------------------------------------
// OfflineGenerator — stands in for the hosted model
// ---------------------------------------------------------------------------

struct OfflineGenerator;

#[async_trait::async_trait]
impl TextGenerator for OfflineGenerator {
    async fn complete(&self, prompt: &str) -> docassist_rag::Result<String> {
        Ok(format!("(offline) the grounded prompt was {} characters; see sources", prompt.len()))
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -- 1. Build the assistant with in-memory components ------------------
    let config = RagConfig::builder().chunk_size(200).chunk_overlap(50).top_k(3).build()?;

    let assistant = DocAssistant::builder()
        .config(config)
        .embedding_provider(Arc::new(MockEmbedder::new(64)))
        .vector_store(Arc::new(MemoryStore::new()))
        .text_generator(Arc::new(OfflineGenerator))
        .build()?;

    // -- 2. A question before any upload hits the fixed empty-store reply --
    let early = assistant.answer("what do my documents say?").await?;
    println!("Before ingesting: {}\n", early.text);

    // -- 3. Ingest sample documents ----------------------------------------
    let files = vec![
        FileUpload::new(
            "rust.txt",
            b"Rust is a systems programming language focused on safety, speed, \
              and concurrency. It achieves memory safety without a garbage \
              collector through its ownership system."
                .to_vec(),
            FileType::Txt,
        ),
        FileUpload::new(
            "rag.txt",
            b"Retrieval-Augmented Generation (RAG) combines a retrieval system \
              with a language model. Documents are chunked, embedded, and stored \
              in a vector database. At query time the most relevant chunks are \
              retrieved and fed to the LLM as context."
                .to_vec(),
            FileType::Txt,
        ),
    ];

    let summary = assistant.ingest(files).await?;
    println!(
        "Ingested {} file(s) into {} chunk(s); {} skipped",
        summary.files_processed,
        summary.chunks_added,
        summary.failures.len()
    );
    println!("Indexed chunks: {}\n", assistant.document_count().await?);

    // -- 4. Ask questions ---------------------------------------------------
    for question in ["how does Rust manage memory?", "what happens at query time?"] {
        println!("Q: {question}");
        let answer = assistant.answer(question).await?;
        println!("A: {}", answer.text);
        for source in &answer.sources {
            let preview: String = source.text.chars().take(60).collect();
            println!(
                "   [{}] {preview}...",
                source.metadata.get("source").map(String::as_str).unwrap_or("?")
            );
        }
        println!();
    }

    // -- 5. Wipe and confirm -------------------------------------------------
    let removed = assistant.wipe().await?;
    println!("Wiped {removed} chunk(s); {} remain", assistant.document_count().await?);

    Ok(())
}
