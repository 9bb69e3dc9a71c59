//! Embedding provider trait and factory.
//!
//! The same provider instance serves both the indexer (chunk batches) and
//! the retriever (single queries), so the model and normalization cannot
//! drift between the two paths. Providers are constructed once by the
//! composition root and shared behind an `Arc`.

pub mod hash;
pub mod ollama;

use beatline_core::config::EmbeddingSettings;
use beatline_core::{AppError, AppResult};
use std::sync::Arc;

/// Trait for embedding providers.
///
/// All returned vectors are L2-normalized (unit norm), which makes
/// inner-product search equivalent to cosine similarity.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync + std::fmt::Debug {
    /// Model identifier (e.g., "bge-m3"); persisted with the index and
    /// validated at load time.
    fn model_name(&self) -> &str;

    /// Embedding vector dimension.
    fn dimensions(&self) -> usize;

    /// Generate unit-norm embeddings for a batch of texts, in input order.
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;

    /// Generate an embedding for a single text (query path).
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let mut results = self.embed_batch(&[text.to_string()]).await?;
        results
            .pop()
            .ok_or_else(|| AppError::Retrieval("No embedding returned".to_string()))
    }
}

/// Create an embedding provider from configuration.
pub fn create_provider(settings: &EmbeddingSettings) -> AppResult<Arc<dyn EmbeddingProvider>> {
    match settings.provider.as_str() {
        "hash" => Ok(Arc::new(hash::HashProvider::new(
            &settings.model,
            settings.dimensions,
        ))),

        "ollama" => Ok(Arc::new(ollama::OllamaProvider::new(
            settings.endpoint.as_deref(),
            &settings.model,
            settings.dimensions,
        ))),

        other => Err(AppError::Config(format!(
            "Unknown embedding provider: '{}'. Supported providers: hash, ollama",
            other
        ))),
    }
}

/// Scale a vector to unit L2 norm in place. Zero vectors are left as-is.
pub(crate) fn normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in vector.iter_mut() {
            *v /= norm;
        }
    }
}
