//! # Chat Demo
//!
//! Ingests the files named on the command line, then answers questions read
//! from stdin until EOF. Uses the Gemini backends and the store selected by
//! the environment (`QDRANT_URL` for the remote backend, `INDEX_DIR`
//! otherwise).
//!
//! Requires: `GOOGLE_API_KEY` (or `GEMINI_API_KEY`).
//!
//! Run: `cargo run --example chat -- notes.txt report.pdf`

use std::io::{BufRead, Write};

use docassist_rag::{DocAssistant, FileUpload, RagConfig, StoreConfig, api_key_from_env};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (for GOOGLE_API_KEY and store settings).
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docassist_rag=info".into()),
        )
        .init();

    let assistant =
        DocAssistant::connect(api_key_from_env()?, StoreConfig::from_env(), RagConfig::default())
            .await?;

    // -- Ingest files given as arguments ------------------------------------
    let paths: Vec<String> = std::env::args().skip(1).collect();
    if !paths.is_empty() {
        let mut files = Vec::new();
        for path in &paths {
            files.push(FileUpload::from_path(path)?);
        }
        let summary = assistant.ingest(files).await?;
        println!(
            "Ingested {} file(s) into {} chunk(s)",
            summary.files_processed, summary.chunks_added
        );
        for failure in &summary.failures {
            eprintln!("skipped {}: {}", failure.file, failure.message);
        }
    }
    println!("Knowledge base holds {} chunk(s)\n", assistant.document_count().await?);

    // -- Question loop -------------------------------------------------------
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    loop {
        print!("question> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();
        if question.is_empty() {
            continue;
        }

        match assistant.answer(question).await {
            Ok(answer) => {
                println!("\n{}\n", answer.text);
                if !answer.sources.is_empty() {
                    println!("Sources:");
                    for source in &answer.sources {
                        let preview: String = source.text.chars().take(80).collect();
                        println!(
                            "  - {}: {preview}...",
                            source.metadata.get("source").map(String::as_str).unwrap_or("?")
                        );
                    }
                    println!();
                }
            }
            Err(e) => eprintln!("error: {e}"),
        }
    }

    Ok(())
}
