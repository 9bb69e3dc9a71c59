//! Text generation abstraction.
//!
//! The chat route hands a question plus retrieved context to whichever
//! generation backend is configured. Backends implement a single capability
//! trait; selection between them is an explicit ordered fallback list (see
//! `fallback`), not import probing.

use beatline_core::AppResult;

/// System prompt for the "ask the DJ" persona.
const SYSTEM_PROMPT: &str = "You are the resident DJ answering questions from website \
visitors about bookings, events, and music. Answer in the language of the question \
(English or Dutch). Be concise and friendly.";

/// Trait for text generation backends.
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Backend name for logging (e.g., "ollama:llama3.2").
    fn name(&self) -> &str;

    /// Generate an answer for the given prompt.
    async fn generate(&self, prompt: &str) -> AppResult<String>;
}

/// Build the grounded prompt from retrieved context and the question.
///
/// An empty context is allowed: the backend then answers ungrounded.
/// Retrieval failure degrades answer quality, it never breaks the flow.
pub fn build_prompt(question: &str, context: &str) -> String {
    if context.trim().is_empty() {
        format!("{}\n\nQuestion: {}", SYSTEM_PROMPT, question)
    } else {
        format!(
            "{}\n\nUse the following website content to ground your answer. \
             Cite nothing outside it when it is relevant.\n\n{}\n\nQuestion: {}",
            SYSTEM_PROMPT, context, question
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_context_and_question() {
        let prompt = build_prompt("How much?", "[Source: pricing.txt]\n500 euros");
        assert!(prompt.contains("pricing.txt"));
        assert!(prompt.contains("Question: How much?"));
    }

    #[test]
    fn test_empty_context_still_produces_prompt() {
        let prompt = build_prompt("How much?", "");
        assert!(prompt.contains("Question: How much?"));
        assert!(!prompt.contains("website content to ground"));
    }
}
