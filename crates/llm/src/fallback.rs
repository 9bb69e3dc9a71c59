//! Ordered fallback over generation backends.
//!
//! Backends are tried in the configured order; the first one that answers
//! wins. A backend failure is logged and the next is tried. Only when every
//! backend fails does the chain report an error.

use crate::generator::TextGenerator;
use beatline_core::{AppError, AppResult};
use std::sync::Arc;

/// Generator that delegates to an explicit, ordered list of backends.
pub struct FallbackGenerator {
    backends: Vec<Arc<dyn TextGenerator>>,
}

impl FallbackGenerator {
    /// Create a fallback chain. The list order is the try order.
    pub fn new(backends: Vec<Arc<dyn TextGenerator>>) -> Self {
        Self { backends }
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

#[async_trait::async_trait]
impl TextGenerator for FallbackGenerator {
    fn name(&self) -> &str {
        "fallback"
    }

    async fn generate(&self, prompt: &str) -> AppResult<String> {
        for backend in &self.backends {
            match backend.generate(prompt).await {
                Ok(answer) => {
                    tracing::info!("Answer generated by {}", backend.name());
                    return Ok(answer);
                }
                Err(e) => {
                    tracing::warn!("Backend {} failed, trying next: {}", backend.name(), e);
                }
            }
        }

        Err(AppError::Llm(
            "All generation backends failed".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedGenerator {
        name: String,
        answer: Option<String>,
    }

    impl FixedGenerator {
        fn ok(name: &str, answer: &str) -> Arc<dyn TextGenerator> {
            Arc::new(Self {
                name: name.to_string(),
                answer: Some(answer.to_string()),
            })
        }

        fn failing(name: &str) -> Arc<dyn TextGenerator> {
            Arc::new(Self {
                name: name.to_string(),
                answer: None,
            })
        }
    }

    #[async_trait::async_trait]
    impl TextGenerator for FixedGenerator {
        fn name(&self) -> &str {
            &self.name
        }

        async fn generate(&self, _prompt: &str) -> AppResult<String> {
            self.answer
                .clone()
                .ok_or_else(|| AppError::Llm(format!("{} is down", self.name)))
        }
    }

    #[tokio::test]
    async fn test_first_success_wins() {
        let chain = FallbackGenerator::new(vec![
            FixedGenerator::ok("primary", "from primary"),
            FixedGenerator::ok("secondary", "from secondary"),
        ]);

        assert_eq!(chain.generate("q").await.unwrap(), "from primary");
    }

    #[tokio::test]
    async fn test_falls_through_failures_in_order() {
        let chain = FallbackGenerator::new(vec![
            FixedGenerator::failing("primary"),
            FixedGenerator::ok("secondary", "from secondary"),
        ]);

        assert_eq!(chain.generate("q").await.unwrap(), "from secondary");
    }

    #[tokio::test]
    async fn test_all_failing_reports_error() {
        let chain = FallbackGenerator::new(vec![
            FixedGenerator::failing("primary"),
            FixedGenerator::failing("secondary"),
        ]);

        assert!(chain.generate("q").await.is_err());
    }

    #[tokio::test]
    async fn test_empty_chain_is_an_error() {
        let chain = FallbackGenerator::new(vec![]);
        assert!(chain.is_empty());
        assert!(chain.generate("q").await.is_err());
    }
}
