//! Ollama text generation provider.
//!
//! Non-streaming completion against a local Ollama runtime.
//! Ollama API: https://github.com/ollama/ollama/blob/main/docs/api.md

use crate::generator::TextGenerator;
use beatline_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const GENERATE_ENDPOINT: &str = "/api/generate";
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Ollama API request format.
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
}

/// Ollama API response format.
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

/// Ollama generation backend for a single model.
pub struct OllamaGenerator {
    name: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaGenerator {
    /// Create a generator for the given model (default URL
    /// `http://localhost:11434`).
    pub fn new(base_url: Option<&str>, model: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            name: format!("ollama:{}", model),
            base_url: base_url.unwrap_or(DEFAULT_OLLAMA_URL).to_string(),
            model: model.to_string(),
            client,
        }
    }
}

#[async_trait::async_trait]
impl TextGenerator for OllamaGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, prompt: &str) -> AppResult<String> {
        tracing::debug!("Sending completion request to {}", self.name);

        let request = OllamaRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
        };

        let url = format!("{}{}", self.base_url, GENERATE_ENDPOINT);
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to reach Ollama: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Llm(format!(
                "Ollama API error ({}): {}",
                status, error_text
            )));
        }

        let parsed: OllamaResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse Ollama response: {}", e)))?;

        Ok(parsed.response)
    }
}
