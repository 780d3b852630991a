//! Grounded answer generation.
//!
//! [`Generator`] composes the grounding prompt from retrieved chunks and the
//! user question, then calls the model once through the [`TextGenerator`]
//! seam. It performs no retries; backend failures propagate as the distinct
//! error kinds the backend reports.

use std::sync::Arc;

use async_trait::async_trait;

use crate::document::Chunk;
use crate::error::Result;

/// A hosted language model that completes a prompt into text.
///
/// One call per invocation, no internal retry loop. Implementations map
/// backend failures onto the `RateLimited`, `Auth`, or `Generation`
/// variants of [`crate::error::AssistantError`].
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for the prompt, returning the raw text.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Instruction template for grounded answering. `{context}` and `{question}`
/// are substituted before the prompt is sent.
const PROMPT_TEMPLATE: &str = "\
Use the following pieces of context to answer the question at the end.
If the answer is not contained in the context, just say that you don't
know; do not try to make up an answer. For multi-part questions, format
the answer with headings, lists, and emphasis where that improves
readability.

Context:
{context}

Question: {question}
Answer:";

/// Separator between chunk texts in the context block.
const CONTEXT_SEPARATOR: &str = "\n\n";

/// Composes grounding prompts and invokes the model.
pub struct Generator {
    backend: Arc<dyn TextGenerator>,
}

impl Generator {
    /// Create a generator over the given model backend.
    pub fn new(backend: Arc<dyn TextGenerator>) -> Self {
        Self { backend }
    }

    /// Answer a question grounded in the given context chunks.
    ///
    /// Chunk texts are joined in retrieval order into the context block.
    /// With no chunks the context block is empty and the instruction
    /// template directs the model to say it cannot find the information.
    pub async fn generate(&self, question: &str, context: &[Chunk]) -> Result<String> {
        let prompt = compose_prompt(question, context);
        self.backend.complete(&prompt).await
    }
}

/// Substitute the context block and question into the instruction template.
fn compose_prompt(question: &str, context: &[Chunk]) -> String {
    let context_text =
        context.iter().map(|c| c.text.as_str()).collect::<Vec<_>>().join(CONTEXT_SEPARATOR);
    PROMPT_TEMPLATE.replace("{context}", &context_text).replace("{question}", question)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn chunk(text: &str) -> Chunk {
        Chunk {
            id: "c".to_string(),
            text: text.to_string(),
            embedding: vec![],
            metadata: HashMap::new(),
            document_id: "d".to_string(),
        }
    }

    #[test]
    fn prompt_contains_context_in_retrieval_order() {
        let prompt = compose_prompt(
            "what is the refund policy?",
            &[chunk("refunds within 30 days"), chunk("store credit after 30 days")],
        );

        let first = prompt.find("refunds within 30 days").unwrap();
        let second = prompt.find("store credit after 30 days").unwrap();
        assert!(first < second);
        assert!(prompt.contains("Question: what is the refund policy?"));
        assert!(!prompt.contains("{context}"));
        assert!(!prompt.contains("{question}"));
    }

    #[test]
    fn prompt_keeps_the_decline_instruction() {
        let prompt = compose_prompt("anything", &[]);
        assert!(prompt.contains("say that you don't\nknow"));
    }

    #[test]
    fn empty_context_yields_an_empty_context_block() {
        let prompt = compose_prompt("q", &[]);
        assert!(prompt.contains("Context:\n\n\nQuestion: q"));
    }

    struct Echo;

    #[async_trait]
    impl TextGenerator for Echo {
        async fn complete(&self, prompt: &str) -> Result<String> {
            Ok(prompt.to_string())
        }
    }

    #[tokio::test]
    async fn generator_sends_the_composed_prompt() {
        let generator = Generator::new(Arc::new(Echo));
        let answer = generator.generate("the question", &[chunk("the context")]).await.unwrap();
        assert!(answer.contains("the context"));
        assert!(answer.contains("the question"));
    }
}
