//! Gemini REST backends for embedding and generation.
//!
//! [`GeminiEmbedder`] calls the `embedContent`/`batchEmbedContents`
//! endpoints of `text-embedding-004`; [`GeminiGenerator`] calls
//! `generateContent` on `gemini-2.5-flash`. Both use `reqwest` directly
//! with hand-rolled request/response types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{AssistantError, Result};
use crate::generation::TextGenerator;

/// The Gemini API base URL.
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// The default embedding model.
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-004";

/// The dimensionality of `text-embedding-004` vectors.
const DEFAULT_DIMENSIONS: usize = 768;

/// The default generation model.
const DEFAULT_GENERATION_MODEL: &str = "gemini-2.5-flash";

/// Sampling temperature for grounded answering.
const GENERATION_TEMPERATURE: f32 = 0.3;

/// API key header understood by the Gemini endpoints.
const API_KEY_HEADER: &str = "x-goog-api-key";

// ── Shared API error shape ─────────────────────────────────────────

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Pull the human-readable message out of a Gemini error body, falling back
/// to the raw body.
fn error_detail(body: String) -> String {
    serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error.message).unwrap_or(body)
}

// ── Embedding ──────────────────────────────────────────────────────

/// An [`EmbeddingProvider`] backed by the Gemini embeddings API.
///
/// The same instance is used for chunk and query embedding, so both sides
/// of every similarity comparison come from the same model.
///
/// # Example
///
/// ```rust,ignore
/// use docassist_rag::GeminiEmbedder;
///
/// let embedder = GeminiEmbedder::new("your-api-key")?;
/// let embedding = embedder.embed("hello world").await?;
/// assert_eq!(embedding.len(), embedder.dimensions());
/// ```
pub struct GeminiEmbedder {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiEmbedder {
    /// Create a new embedder with the given API key and the default
    /// `text-embedding-004` model.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(AssistantError::Config("API key must not be empty".to_string()));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
        })
    }

    /// Set the embedding model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn embed_err(message: String) -> AssistantError {
        AssistantError::Embedding { provider: "Gemini".to_string(), message }
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: String,
    content: Content<'a>,
}

#[derive(Serialize)]
struct BatchEmbedRequest<'a> {
    requests: Vec<EmbedRequest<'a>>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: EmbeddingValues,
}

#[derive(Deserialize)]
struct BatchEmbedResponse {
    embeddings: Vec<EmbeddingValues>,
}

#[derive(Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(provider = "Gemini", text_len = text.len(), "embedding single text");

        let url = format!("{GEMINI_BASE_URL}/models/{}:embedContent", self.model);
        let request = EmbedRequest {
            model: format!("models/{}", self.model),
            content: Content { role: "user", parts: vec![TextPart { text }] },
        };

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "Gemini", error = %e, "embedding request failed");
                Self::embed_err(format!("request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = error_detail(response.text().await.unwrap_or_default());
            error!(provider = "Gemini", %status, "embedding API error");
            return Err(Self::embed_err(format!("API returned {status}: {detail}")));
        }

        let parsed: EmbedResponse = response
            .json()
            .await
            .map_err(|e| Self::embed_err(format!("failed to parse response: {e}")))?;

        Ok(parsed.embedding.values)
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(provider = "Gemini", batch_size = texts.len(), "embedding batch");

        let url = format!("{GEMINI_BASE_URL}/models/{}:batchEmbedContents", self.model);
        let request = BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|text| EmbedRequest {
                    model: format!("models/{}", self.model),
                    content: Content { role: "user", parts: vec![TextPart { text }] },
                })
                .collect(),
        };

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "Gemini", error = %e, "batch embedding request failed");
                Self::embed_err(format!("request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = error_detail(response.text().await.unwrap_or_default());
            error!(provider = "Gemini", %status, "batch embedding API error");
            return Err(Self::embed_err(format!("API returned {status}: {detail}")));
        }

        let parsed: BatchEmbedResponse = response
            .json()
            .await
            .map_err(|e| Self::embed_err(format!("failed to parse response: {e}")))?;

        Ok(parsed.embeddings.into_iter().map(|e| e.values).collect())
    }

    fn dimensions(&self) -> usize {
        DEFAULT_DIMENSIONS
    }
}

// ── Generation ─────────────────────────────────────────────────────

/// A [`TextGenerator`] backed by the Gemini `generateContent` endpoint.
///
/// One request per call, no internal retry. HTTP status codes map onto the
/// engine's error kinds: 429 is [`AssistantError::RateLimited`], 401 and
/// 403 are [`AssistantError::Auth`], everything else non-successful is
/// [`AssistantError::Generation`].
pub struct GeminiGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiGenerator {
    /// Create a new generator with the given API key and the default
    /// `gemini-2.5-flash` model.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(AssistantError::Config("API key must not be empty".to_string()));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_GENERATION_MODEL.to_string(),
        })
    }

    /// Set the generation model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<TextPart<'a>>,
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn complete(&self, prompt: &str) -> Result<String> {
        debug!(provider = "Gemini", model = %self.model, prompt_len = prompt.len(), "generating");

        let url = format!("{GEMINI_BASE_URL}/models/{}:generateContent", self.model);
        let request = GenerateRequest {
            contents: vec![Content { role: "user", parts: vec![TextPart { text: prompt }] }],
            generation_config: GenerationConfig { temperature: GENERATION_TEMPERATURE },
        };

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "Gemini", error = %e, "generation request failed");
                AssistantError::Generation(format!("request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = error_detail(response.text().await.unwrap_or_default());
            error!(provider = "Gemini", %status, "generation API error");
            return Err(match status.as_u16() {
                429 => AssistantError::RateLimited(detail),
                401 | 403 => AssistantError::Auth(detail),
                _ => AssistantError::Generation(format!("API returned {status}: {detail}")),
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::Generation(format!("failed to parse response: {e}")))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content.parts.into_iter().filter_map(|p| p.text).collect::<Vec<_>>().join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AssistantError::Generation(
                "model returned no text candidates".to_string(),
            ));
        }

        Ok(text)
    }
}
