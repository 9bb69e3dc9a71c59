//! Ollama embedding provider.
//!
//! Talks to a local Ollama runtime over HTTP (`/api/embeddings`). The
//! default model is `bge-m3`, a multilingual model that handles Dutch and
//! English well.

use super::{normalize, EmbeddingProvider};
use beatline_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const EMBEDDING_ENDPOINT: &str = "/api/embeddings";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Request payload for the Ollama embeddings API.
#[derive(Debug, Serialize)]
struct EmbeddingRequest {
    model: String,
    prompt: String,
}

/// Response from the Ollama embeddings API.
#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

/// Ollama embedding provider.
#[derive(Debug)]
pub struct OllamaProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    dimensions: usize,
}

impl OllamaProvider {
    /// Create a provider against the given base URL (default
    /// `http://localhost:11434`).
    pub fn new(base_url: Option<&str>, model: &str, dimensions: usize) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.unwrap_or(DEFAULT_OLLAMA_URL).to_string(),
            model: model.to_string(),
            dimensions,
        }
    }

    async fn embed_one(&self, text: &str) -> AppResult<Vec<f32>> {
        let url = format!("{}{}", self.base_url, EMBEDDING_ENDPOINT);
        let request = EmbeddingRequest {
            model: self.model.clone(),
            prompt: text.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Retrieval(format!("Failed to reach Ollama: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Retrieval(format!(
                "Ollama embeddings API error ({}): {}",
                status, error_text
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| AppError::Retrieval(format!("Failed to parse embedding: {}", e)))?;

        let mut embedding = parsed.embedding;

        if embedding.len() != self.dimensions {
            return Err(AppError::Retrieval(format!(
                "Model '{}' returned {}-dim embedding, expected {}",
                self.model,
                embedding.len(),
                self.dimensions
            )));
        }

        normalize(&mut embedding);
        Ok(embedding)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for OllamaProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed_one(text).await?);
        }
        Ok(results)
    }
}
